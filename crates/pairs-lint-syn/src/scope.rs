//! Local binding tracking for argument and receiver typing.
//!
//! Tracks what is statically known about each local name in nested scopes.
//! Shadowing matters: a later `let` with no known type hides an earlier typed
//! binding of the same name. A nested `fn` cannot see the locals of the body
//! it is declared in, only its `const` items.

use pairs_lint_core::{ConstantKind, StaticType};
use std::collections::HashMap;

/// What is known about a local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Binding {
    /// A variable with a known static type.
    Typed(StaticType),
    /// A local `const` item.
    Const(ConstantKind),
    /// Bound, but nothing is known about it.
    Unknown,
}

/// Tracks bindings across nested scopes.
pub(crate) struct ScopeTracker {
    /// Stack of scope frames, innermost last.
    frames: Vec<HashMap<String, Binding>>,
    /// Indices of frames opened by a function body.
    fn_frames: Vec<usize>,
}

impl Default for ScopeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
            fn_frames: Vec::new(),
        }
    }

    /// Push a new scope frame.
    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Push the frame of a function body. Locals of enclosing frames are
    /// hidden until it is popped.
    pub fn push_fn_frame(&mut self) {
        self.fn_frames.push(self.frames.len());
        self.frames.push(HashMap::new());
    }

    /// Pop the current scope frame. The outermost frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
            if self.fn_frames.last() == Some(&self.frames.len()) {
                self.fn_frames.pop();
            }
        }
    }

    /// Bind a name in the current scope, shadowing outer bindings.
    pub fn bind(&mut self, name: impl Into<String>, binding: Binding) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), binding);
        }
    }

    /// Looks a name up from the innermost scope outwards.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        let body = self.fn_frames.last().copied().unwrap_or(0);
        self.frames
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, frame)| {
                let binding = frame.get(name)?;
                (i >= body || matches!(binding, Binding::Const(_))).then_some(binding)
            })
    }

    /// The current nesting depth.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_and_frames() {
        let mut scopes = ScopeTracker::new();
        scopes.bind("key", Binding::Typed(StaticType::string("String")));

        scopes.push_frame();
        assert_eq!(scopes.depth(), 2);
        assert!(matches!(scopes.lookup("key"), Some(Binding::Typed(_))));

        scopes.bind("key", Binding::Unknown);
        assert_eq!(scopes.lookup("key"), Some(&Binding::Unknown));

        scopes.pop_frame();
        assert!(matches!(scopes.lookup("key"), Some(Binding::Typed(_))));
        assert_eq!(scopes.lookup("other"), None);
    }

    #[test]
    fn test_fn_frame_hides_outer_locals() {
        let mut scopes = ScopeTracker::new();
        scopes.push_fn_frame();
        scopes.bind("key", Binding::Typed(StaticType::string("&str")));
        scopes.bind("N", Binding::Const(ConstantKind::Other("u8".to_string())));
        scopes.push_frame();

        scopes.push_fn_frame();
        assert_eq!(scopes.lookup("key"), None);
        assert!(matches!(scopes.lookup("N"), Some(Binding::Const(_))));
        scopes.pop_frame();

        assert!(matches!(scopes.lookup("key"), Some(Binding::Typed(_))));
        scopes.pop_frame();
        scopes.pop_frame();
        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.lookup("key"), None);
    }

    #[test]
    fn test_global_frame_survives_pop() {
        let mut scopes = ScopeTracker::new();
        scopes.bind("N", Binding::Const(ConstantKind::Other("u8".to_string())));
        scopes.pop_frame();
        scopes.pop_frame();
        assert_eq!(scopes.depth(), 1);
        assert!(scopes.lookup("N").is_some());
    }
}

pub struct Pairs(Vec<(&'static str, String)>);

impl Pairs {
    pub fn new() -> Self {
        Pairs(Vec::new())
    }
}

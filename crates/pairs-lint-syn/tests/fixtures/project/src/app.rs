use crate::kv::Pairs;
use crate::log::{self, Logger};
use tracing::info;

const KEY: &str = "user";

pub fn run(logger: &Logger, err: Error, id: u64) {
    logger.log("a", 1, "b", 2);
    logger.log("a", 1, "b");
    logger.log(1, "a");
    logger.log(KEY, id, id, "x");
    logger.log(Pairs::new());
    logger.log(Pairs::new(), "a", 1, "b");

    log::wrap(err, "id", id);
    log::wrap(err, "id");
    log::wrap(err);

    info!("started", "user", KEY);
    info!("started", "user");
}

// ctxlog/src/bin/request_example.rs
//
// Simulates a few requests to show deferred emission: successful requests
// print nothing but their explicit `print` lines, failed requests print their
// whole history.
//
// Try `CTXLOG_DEBUG=1` or `CTXLOG_FORMAT=json`.

use anyhow::Result;
use ctxlog::config::Config;
use ctxlog::{keyvals, Context, LoggingContext};

struct Handler {
    ctx: Context,
}

impl LoggingContext for Handler {
    fn context(&self) -> &Context {
        &self.ctx
    }
}

impl Handler {
    fn locate(&self, ip: &str) -> Option<(f64, f64)> {
        self.log_debug("looking up location", keyvals! { "ip" => ip });
        match ip {
            "8.8.8.8" => Some((37.751, -97.822)),
            "1.1.1.1" => Some((-33.494, 143.210)),
            _ => None,
        }
    }

    fn forecast(&self, ip: &str) {
        self.log_info("forecast requested", keyvals! { "ip" => ip });
        match self.locate(ip) {
            Some((lat, long)) => {
                self.log_info("located", keyvals! { "lat" => lat, "long" => long });
                self.log_print("forecast served", keyvals![]);
            }
            None => self.log_error("location unknown", keyvals! { "ip" => ip }),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::from_env()?;
    log::debug!("request_example: using {:?}", config);

    for (n, ip) in ["8.8.8.8", "10.0.0.1", "1.1.1.1"].iter().enumerate() {
        let ctx = ctxlog::context(&Context::background(), config.options());
        let ctx = ctxlog::with(&ctx, keyvals! { "req_id" => format!("r{}", n + 1) });
        let handler = Handler { ctx };
        handler.forecast(ip);
    }
    Ok(())
}

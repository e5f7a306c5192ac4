use std::io;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use ctxlog::logging::{
    format_text, with_clock, with_debug, with_format, with_writer, MemoryWriter,
};
use ctxlog::{keyvals, Context, KeyVals, Logger, LoggingContext, Severity};

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

fn setup(debug: bool) -> (Context, MemoryWriter) {
    let out = MemoryWriter::new();
    let ctx = ctxlog::context(
        &Context::background(),
        vec![
            with_writer(out.clone()),
            with_format(format_text),
            with_debug(debug),
            with_clock(fixed_time),
        ],
    );
    (ctx, out)
}

fn line(level: &str, msg: &str, kv: &str) -> String {
    let msg = if msg.contains(' ') {
        format!("{:?}", msg)
    } else {
        msg.to_string()
    };
    let mut line = format!("time=2024-01-02T03:04:05.000Z level={} msg={}", level, msg);
    if !kv.is_empty() {
        line.push(' ');
        line.push_str(kv);
    }
    line
}

#[test]
fn test_request_scenario() -> Result<()> {
    let (ctx, out) = setup(false);
    let ctx = ctxlog::with(&ctx, keyvals!["req_id", "r1"]);

    ctxlog::debug(&ctx, "start", keyvals![]);
    ctxlog::info(&ctx, "step1", keyvals![]);
    assert!(out.lines().is_empty());

    ctxlog::error(&ctx, "boom", keyvals![]);
    assert_eq!(
        out.lines(),
        vec![
            line("INFO", "step1", "req_id=r1"),
            line("ERRO", "boom", "req_id=r1"),
        ]
    );
    Ok(())
}

#[test]
fn test_request_scenario_debug() -> Result<()> {
    let (ctx, out) = setup(true);
    let ctx = ctxlog::with(&ctx, keyvals!["req_id", "r1"]);

    ctxlog::debug(&ctx, "start", keyvals![]);
    ctxlog::info(&ctx, "step1", keyvals![]);
    // Debug mode writes in real time
    assert_eq!(out.lines().len(), 2);

    ctxlog::error(&ctx, "boom", keyvals![]);
    assert_eq!(
        out.lines(),
        vec![
            line("DEBG", "start", "req_id=r1"),
            line("INFO", "step1", "req_id=r1"),
            line("ERRO", "boom", "req_id=r1"),
        ]
    );
    Ok(())
}

#[test]
fn test_prefix_then_call_site_pairs() {
    let (ctx, out) = setup(false);
    let ctx = ctxlog::with(&ctx, keyvals!["a", 1]);
    let ctx = ctxlog::with(&ctx, keyvals!["b", 2, "a", 3]);
    ctxlog::print(&ctx, "msg", keyvals!["c", 4, "b", 5]);

    assert_eq!(out.lines(), vec![line("INFO", "msg", "a=1 b=2 a=3 c=4 b=5")]);
}

#[test]
fn test_debug_dropped_when_debug_off() {
    let (ctx, out) = setup(false);
    let logger = ctxlog::logger(&ctx).unwrap();

    ctxlog::debug(&ctx, "buffered?", keyvals![]);
    assert_eq!(logger.pending(), 0);

    ctxlog::flush(&ctx);
    ctxlog::debug(&ctx, "after flush", keyvals![]);
    ctxlog::log(&ctx, Severity::Debug, false, "unbuffered", keyvals![]);
    assert!(out.lines().is_empty());
}

#[test]
fn test_error_flushes_in_order() {
    let (ctx, out) = setup(false);
    ctxlog::info(&ctx, "one", keyvals![]);
    ctxlog::info(&ctx, "two", keyvals![]);
    ctxlog::info(&ctx, "three", keyvals![]);
    ctxlog::error(&ctx, "failed", keyvals!["code", 500]);

    assert_eq!(
        out.lines(),
        vec![
            line("INFO", "one", ""),
            line("INFO", "two", ""),
            line("INFO", "three", ""),
            line("ERRO", "failed", "code=500"),
        ]
    );
}

#[test]
fn test_flush_is_idempotent() {
    let (ctx, out) = setup(false);
    ctxlog::info(&ctx, "once", keyvals![]);

    ctxlog::flush(&ctx);
    ctxlog::flush(&ctx);

    assert_eq!(out.lines(), vec![line("INFO", "once", "")]);
}

#[test]
fn test_nothing_buffers_after_flush() {
    let (ctx, out) = setup(false);
    let logger = ctxlog::logger(&ctx).unwrap();
    assert!(!logger.is_flushed());

    ctxlog::flush(&ctx);
    assert!(logger.is_flushed());

    for i in 0..5 {
        ctxlog::info(&ctx, format!("entry {}", i), keyvals![]);
        assert_eq!(logger.pending(), 0);
    }
    assert_eq!(out.lines().len(), 5);
}

#[test]
fn test_print_is_immediate() {
    let (ctx, out) = setup(false);
    let logger = ctxlog::logger(&ctx).unwrap();

    ctxlog::info(&ctx, "held", keyvals![]);
    ctxlog::print(&ctx, "now", keyvals![]);

    // Print does not flush the buffer
    assert_eq!(out.lines(), vec![line("INFO", "now", "")]);
    assert_eq!(logger.pending(), 1);
    assert!(!logger.is_flushed());
}

#[test]
fn test_prefix_read_at_flush_time() {
    let (ctx, out) = setup(false);
    ctxlog::info(&ctx, "first", keyvals!["n", 1]);
    ctxlog::info(&ctx, "second", keyvals![]);
    ctxlog::print(&ctx, "printed", keyvals![]);

    ctxlog::with(&ctx, keyvals!["req_id", "late"]);
    ctxlog::flush(&ctx);
    ctxlog::with(&ctx, keyvals!["after", true]);

    assert_eq!(
        out.lines(),
        vec![
            line("INFO", "printed", ""),
            line("INFO", "first", "req_id=late n=1"),
            line("INFO", "second", "req_id=late"),
        ]
    );
}

#[test]
fn test_odd_keyvals_are_padded() {
    let (ctx, out) = setup(false);
    ctxlog::with(&ctx, keyvals!["dangling"]);
    ctxlog::print(&ctx, "msg", keyvals!["x", 1, "y"]);

    assert_eq!(
        out.lines(),
        vec![line("INFO", "msg", "dangling=null x=1 y=null")]
    );
}

#[test]
fn test_invalid_key() {
    let (ctx, out) = setup(false);
    ctxlog::print(&ctx, "msg", keyvals![42, "v"]);

    assert_eq!(out.lines(), vec![line("INFO", "msg", "<INVALID>=v")]);
}

#[test]
fn test_no_logger_is_noop() {
    let ctx = Context::background();
    assert!(ctxlog::logger(&ctx).is_none());

    let same = ctxlog::with(&ctx, keyvals!["a", 1]);
    assert!(ctxlog::logger(&same).is_none());

    ctxlog::debug(&ctx, "d", keyvals![]);
    ctxlog::info(&ctx, "i", keyvals![]);
    ctxlog::print(&ctx, "p", keyvals![]);
    ctxlog::error(&ctx, "e", keyvals![]);
    ctxlog::flush(&ctx);
}

#[test]
fn test_reinitialize_keeps_state() -> Result<()> {
    let (ctx, out) = setup(false);
    let parent = ctxlog::logger(&ctx).unwrap();
    ctxlog::with(&ctx, keyvals!["req_id", "r1"]);
    ctxlog::info(&ctx, "from parent", keyvals![]);

    let child = ctx.with_value("handler", "forecast".to_string());
    let child = ctxlog::context(&child, vec![with_debug(true)]);
    let logger = ctxlog::logger(&child).unwrap();
    assert!(logger.same_state(&parent));
    assert_eq!(logger.id(), parent.id());
    assert!(parent.is_debug());
    assert_eq!(parent.pending(), 1);

    ctxlog::info(&child, "from child", keyvals![]);
    assert_eq!(
        out.lines(),
        vec![
            line("INFO", "from parent", "req_id=r1"),
            line("INFO", "from child", "req_id=r1"),
        ]
    );
    Ok(())
}

#[test]
fn test_enabling_debug_mid_request_flushes_once() {
    let (ctx, out) = setup(false);
    let logger = ctxlog::logger(&ctx).unwrap();
    ctxlog::info(&ctx, "a", keyvals![]);
    ctxlog::info(&ctx, "b", keyvals![]);

    logger.configure(vec![with_debug(true)]);
    // Nothing happens until the next log call
    assert!(out.lines().is_empty());

    ctxlog::debug(&ctx, "c", keyvals![]);
    assert_eq!(
        out.lines(),
        vec![
            line("INFO", "a", ""),
            line("INFO", "b", ""),
            line("DEBG", "c", ""),
        ]
    );

    // Turning debug off again does not bring buffering back
    logger.configure(vec![with_debug(false)]);
    ctxlog::info(&ctx, "d", keyvals![]);
    assert_eq!(out.lines().len(), 4);
    assert_eq!(logger.pending(), 0);
}

#[test]
fn test_separate_contexts_are_independent() {
    let (ctx1, out1) = setup(false);
    let (ctx2, out2) = setup(false);

    ctxlog::info(&ctx1, "one", keyvals![]);
    ctxlog::info(&ctx2, "two", keyvals![]);
    ctxlog::error(&ctx1, "bad", keyvals![]);

    assert_eq!(out1.lines().len(), 2);
    assert!(out2.lines().is_empty());
    assert_ne!(
        ctxlog::logger(&ctx1).unwrap().id(),
        ctxlog::logger(&ctx2).unwrap().id()
    );
}

#[test]
fn test_cancelled_context_still_logs() {
    let (ctx, out) = setup(false);
    let (ctx, cancel) = ctx.with_cancel();
    cancel.cancel();
    assert!(ctx.is_cancelled());

    ctxlog::print(&ctx, "still here", keyvals![]);
    assert_eq!(out.lines(), vec![line("INFO", "still here", "")]);
}

#[test]
fn test_concurrent_logging() {
    let (ctx, out) = setup(false);
    let logger = ctxlog::logger(&ctx).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ctx = ctx.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    ctxlog::info(&ctx, "work", keyvals!["thread", t, "i", i]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(logger.pending(), 400);

    ctxlog::flush(&ctx);
    assert_eq!(out.lines().len(), 400);
}

#[test]
fn test_explicit_handle() {
    let out = MemoryWriter::new();
    let logger = Logger::new(vec![
        with_writer(out.clone()),
        with_format(format_text),
        with_clock(fixed_time),
    ]);
    logger.with(keyvals!["svc", "front"]);
    logger.info("queued", KeyVals::new());
    logger.error("failed", keyvals!["attempt", 2]);

    let ctx = logger.attach(&Context::background());
    ctxlog::print(&ctx, "via context", keyvals![]);

    assert_eq!(
        out.lines(),
        vec![
            line("INFO", "queued", "svc=front"),
            line("ERRO", "failed", "svc=front attempt=2"),
            line("INFO", "via context", "svc=front"),
        ]
    );
}

struct Handler {
    ctx: Context,
}

impl LoggingContext for Handler {
    fn context(&self) -> &Context {
        &self.ctx
    }
}

#[test]
fn test_logging_context_trait() {
    let (ctx, out) = setup(false);
    let handler = Handler { ctx };

    handler.log_info("held", keyvals![]);
    handler.log_debug("dropped", keyvals![]);
    handler.log_print("printed", keyvals![]);
    handler.log_flush();
    handler.log_error("failed", keyvals![]);

    assert_eq!(
        out.lines(),
        vec![
            line("INFO", "printed", ""),
            line("INFO", "held", ""),
            line("ERRO", "failed", ""),
        ]
    );
}

struct FailingWriter {
    attempts: Arc<Mutex<usize>>,
}

impl io::Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        *self.attempts.lock().unwrap() += 1;
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_writer_failure_is_ignored() {
    let attempts = Arc::new(Mutex::new(0));
    let ctx = ctxlog::context(
        &Context::background(),
        vec![with_writer(FailingWriter {
            attempts: attempts.clone(),
        })],
    );

    ctxlog::info(&ctx, "a", keyvals![]);
    ctxlog::error(&ctx, "b", keyvals![]);
    ctxlog::print(&ctx, "c", keyvals![]);

    assert_eq!(*attempts.lock().unwrap(), 3);
    assert!(ctxlog::logger(&ctx).unwrap().is_flushed());
}

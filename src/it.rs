use {
    crate::{
        it::{testrun::TestRun, tests::TestCase},
        logger::Logger,
    },
    ahash::AHashMap,
    isnt::std_1::vec::IsntVecExt,
    log::LevelFilter,
    std::sync::Once,
};

#[macro_use]
mod test_error;
#[macro_use]
mod test_macros;
pub mod test_gfx_api;
pub mod test_policy;
pub mod test_sink;
pub mod testrun;

fn init_logger() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        if let Ok(logger) = Logger::install_stderr(LevelFilter::Trace) {
            if std::env::var_os("WL_SHELL_QUIET_TESTS").is_some() {
                logger.set_level(LevelFilter::Warn);
            }
        }
    });
}

fn run_tests_(tests: Vec<&'static dyn TestCase>) {
    init_logger();
    let mut failed = AHashMap::new();
    for test in tests {
        if let Err(e) = run_test(test) {
            failed.insert(test.name(), e);
        }
    }
    if failed.is_empty() {
        return;
    }
    let mut failed: Vec<_> = failed.into_iter().collect();
    failed.sort_by_key(|f| f.0);
    log::error!("The following tests failed:");
    for (name, error) in &failed {
        log::error!("    {}: {}", name, error);
    }
    let names: Vec<_> = failed.iter().map(|f| f.0).collect();
    panic!("Some tests failed: {:?}", names);
}

fn run_test(test: &'static dyn TestCase) -> Result<(), String> {
    log::info!("Running {}", test.name());
    let run = TestRun::with_config(test.config());
    let res = test.run(run.clone());
    let mut errors = vec![];
    if let Err(e) = res {
        errors.push(e.to_string());
    }
    run.destroy();
    if run.has_leaks() {
        errors.push("Objects of the client are still alive after it was destroyed".to_string());
    }
    if errors.is_not_empty() {
        return Err(errors.join("; "));
    }
    Ok(())
}

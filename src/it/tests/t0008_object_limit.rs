use {
    crate::{
        config::ShellConfig,
        it::{test_error::TestError, testrun::TestRun},
        wire::Event,
    },
    std::rc::Rc,
};

testcase!(ShellConfig {
    max_objects_per_client: 5,
    ..Default::default()
});

/// Test that clients cannot create more objects than allowed
fn test(run: Rc<TestRun>) -> Result<(), TestError> {
    tassert_eq!(run.client.num_objects(), 3);

    let _first = run.surface()?;
    let second = run.surface()?;
    tassert_eq!(run.client.num_objects(), 5);

    tassert!(run.surface().is_err());
    tassert_eq!(run.events(), vec![Event::NoMemory]);
    tassert!(!run.client.is_killed());
    tassert_eq!(run.client.num_objects(), 5);

    second.destroy()?;
    tassert_eq!(run.client.num_objects(), 4);
    let _third = run.surface()?;
    tassert!(run.events().is_empty());

    Ok(())
}

use {
    crate::{
        it::{test_error::TestError, testrun::TestRun},
        rect::Rect,
        wire::Event,
    },
    std::rc::Rc,
};

testcase!();

/// Test when buffers are handed back to the client
fn test(run: Rc<TestRun>) -> Result<(), TestError> {
    let surface = run.surface()?;

    let first = run.buffer(64, 64)?;
    surface.attach(Some(&first), 0, 0);
    surface.commit()?;
    tassert!(surface.is_mapped());
    tassert_eq!(run.importer.num_uploads(), 1);
    tassert!(run.events().is_empty());

    surface.attach(Some(&first), 0, 0);
    surface.damage_buffer(0, 0, 10, 10);
    surface.commit()?;
    let Some(upload) = run.importer.last_upload() else {
        bail!("The buffer was not uploaded again");
    };
    tassert!(upload.reused);
    tassert_eq!(upload.damage.extents(), Rect::new_sized(0, 0, 10, 10).unwrap());
    tassert!(run.events().is_empty());

    let second = run.buffer(64, 64)?;
    surface.attach(Some(&second), 0, 0);
    surface.commit()?;
    tassert_eq!(
        run.events(),
        vec![Event::BufferRelease { buffer: first.id }]
    );

    let reader = second.acquire_reader();
    let third = run.buffer(32, 32)?;
    surface.attach(Some(&third), 0, 0);
    surface.commit()?;
    tassert!(second.is_release_pending());
    tassert!(run.events().is_empty());
    drop(reader);
    tassert_eq!(
        run.events(),
        vec![Event::BufferRelease { buffer: second.id }]
    );
    tassert_eq!(surface.size(), (32, 32));

    run.importer.reject.set(true);
    let fourth = run.buffer(16, 16)?;
    surface.attach(Some(&fourth), 0, 0);
    surface.commit()?;
    tassert_eq!(
        run.events(),
        vec![Event::BufferRelease { buffer: fourth.id }]
    );
    tassert!(surface.is_mapped());
    tassert_eq!(surface.size(), (32, 32));
    tassert!(surface.buffer().is_some_and(|b| b.buffer.id == third.id));
    run.importer.reject.set(false);

    surface.attach(None, 0, 0);
    surface.commit()?;
    tassert!(!surface.is_mapped());
    tassert_eq!(surface.size(), (0, 0));
    tassert_eq!(
        run.events(),
        vec![Event::BufferRelease { buffer: third.id }]
    );

    Ok(())
}

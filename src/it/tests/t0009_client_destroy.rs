use {
    crate::it::{test_error::TestError, testrun::TestRun},
    std::rc::{Rc, Weak},
};

testcase!();

/// Test that destroying a client releases all of its objects
fn test(run: Rc<TestRun>) -> Result<(), TestError> {
    let weak = {
        let window = run.map_toplevel(100, 100)?;
        let (child, ss) = run.subsurface(&window.surface)?;
        run.commit_buffer(&child, 10, 10)?;
        window.surface.frame()?;
        window.surface.commit()?;
        tassert!(window.surface.has_frame_requests());

        let pos = run.positioner(20, 20, (0, 0, 10, 10))?;
        let popup = run.map_popup(&window.xdg, &pos)?;
        popup.popup.grab(&run.seat, run.state.next_serial());

        let cursor = run.surface()?;
        run.seat.set_cursor_surface(Some(&cursor), 0, 0)?;
        tassert!(run.seat.active_popup_grab().is_some());

        let weak: Vec<Weak<dyn std::any::Any>> = vec![
            Rc::downgrade(&window.xdg) as _,
            Rc::downgrade(&window.toplevel) as _,
            Rc::downgrade(&ss) as _,
            Rc::downgrade(&popup.xdg) as _,
            Rc::downgrade(&popup.popup) as _,
            Rc::downgrade(&pos) as _,
        ];
        weak
    };

    run.state.destroy_client(run.client.id);
    tassert!(run.client.is_killed());
    tassert_eq!(run.client.num_objects(), 0);
    tassert!(run.state.clients.is_empty());
    tassert!(run.seat.active_popup_grab().is_none());
    tassert!(run.seat.cursor().is_none());
    tassert!(run.seat.pointer_focus().is_none());
    tassert!(run.seat.touch_focus().is_none());
    tassert!(!run.has_leaks());
    for w in &weak {
        tassert_eq!(w.strong_count(), 0);
    }

    Ok(())
}

use {
    crate::{
        it::{test_error::TestError, testrun::TestRun},
        object::ObjectId,
        rect::Rect,
        wire::Event,
    },
    std::rc::Rc,
};

testcase!();

const TOP_LEFT: u32 = 5;
const BOTTOM_RIGHT: u32 = 8;

/// Test popup placement relative to the parent window geometry
fn test(run: Rc<TestRun>) -> Result<(), TestError> {
    let window = run.map_toplevel(200, 200)?;
    run.events();

    let pos = run.positioner(40, 30, (0, 0, 100, 50))?;
    pos.set_anchor(TOP_LEFT)?;
    pos.set_gravity(BOTTOM_RIGHT)?;
    pos.set_offset(10, 5);
    let popup = run.map_popup(&window.xdg, &pos)?;
    tassert_eq!(
        popup.popup.relative_position(),
        Rect::new_sized(10, 5, 40, 30).unwrap()
    );
    let events = run.events();
    tassert_eq!(
        &events[0],
        &Event::PopupConfigure {
            popup: popup.popup.id,
            x: 10,
            y: 5,
            width: 40,
            height: 30,
        }
    );
    tassert_matches!(&events[1], Event::XdgSurfaceConfigure { .. });
    tassert_eq!(popup.surface.position(), (10.0, 5.0));
    tassert!(popup.surface.is_mapped());

    window.xdg.set_window_geometry(20, 20, 100, 100)?;
    window.surface.commit()?;
    tassert_eq!(popup.surface.position(), (30.0, 25.0));

    window.surface.set_position(100.0, 0.0);
    tassert_eq!(popup.surface.position(), (130.0, 25.0));

    let pos2 = run.positioner(40, 30, (0, 0, 100, 50))?;
    pos2.set_anchor(BOTTOM_RIGHT)?;
    pos2.set_gravity(TOP_LEFT)?;
    popup.popup.reposition(&pos2, 7)?;
    tassert_eq!(
        popup.popup.relative_position(),
        Rect::new_sized(60, 20, 40, 30).unwrap()
    );
    let events = run.events();
    tassert_eq!(
        &events[0],
        &Event::PopupRepositioned {
            popup: popup.popup.id,
            token: 7,
        }
    );
    tassert_matches!(&events[1], Event::PopupConfigure { x: 60, y: 20, .. });
    tassert_eq!(popup.surface.position(), (180.0, 40.0));

    let incomplete = run.wm_base.create_positioner()?;
    incomplete.set_size(10, 10)?;
    let surface = run.surface()?;
    let xdg = run.wm_base.get_xdg_surface(&surface)?;
    tassert!(xdg.get_popup(Some(&window.xdg), &incomplete).is_err());
    tassert_eq!(
        run.protocol_error(),
        Some((ObjectId::from(run.wm_base.id), 5))
    );

    Ok(())
}

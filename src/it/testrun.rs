use {
    crate::{
        client::Client,
        config::ShellConfig,
        ifs::{
            wl_buffer::WlBuffer,
            wl_compositor::WlCompositor,
            wl_seat::{ButtonState, KEYBOARD, POINTER, TOUCH, WlSeatGlobal},
            wl_subcompositor::WlSubcompositor,
            wl_surface::{
                WlSurface,
                wl_subsurface::WlSubsurface,
                xdg_surface::{XdgSurface, xdg_popup::XdgPopup, xdg_toplevel::XdgToplevel},
            },
            xdg_positioner::XdgPositioner,
            xdg_wm_base::XdgWmBase,
        },
        it::{
            test_error::{TestErrorExt, TestResult},
            test_gfx_api::TestImporter,
            test_policy::TestPolicy,
            test_sink::TestSink,
        },
        object::ObjectId,
        state::State,
        wire::Event,
    },
    std::{
        cell::RefCell,
        rc::{Rc, Weak},
    },
};

const BTN_LEFT: u32 = 0x110;

/// A state with one connected client that has bound every global.
pub struct TestRun {
    pub state: Rc<State>,
    pub client: Rc<Client>,
    pub compositor: Rc<WlCompositor>,
    pub subcompositor: Rc<WlSubcompositor>,
    pub wm_base: Rc<XdgWmBase>,
    pub seat: Rc<WlSeatGlobal>,
    pub policy: Rc<TestPolicy>,
    pub sink: Rc<TestSink>,
    pub importer: Rc<TestImporter>,
    surfaces: RefCell<Vec<Weak<WlSurface>>>,
}

pub struct TestWindow {
    pub surface: Rc<WlSurface>,
    pub xdg: Rc<XdgSurface>,
    pub toplevel: Rc<XdgToplevel>,
}

pub struct TestPopup {
    pub surface: Rc<WlSurface>,
    pub xdg: Rc<XdgSurface>,
    pub popup: Rc<XdgPopup>,
}

impl TestRun {
    pub fn new() -> Rc<Self> {
        Self::with_config(ShellConfig::default())
    }

    pub fn with_config(config: ShellConfig) -> Rc<Self> {
        let state = State::new(config);
        let policy = Rc::new(TestPolicy::default());
        state.set_policy(policy.clone());
        let importer = Rc::new(TestImporter::default());
        state.set_importer(importer.clone());
        let sink = Rc::new(TestSink::default());
        let seat = state.create_seat("seat0", POINTER | KEYBOARD | TOUCH, sink.clone());
        let client = state.create_client();
        let compositor = client.bind_compositor().unwrap();
        let subcompositor = client.bind_subcompositor().unwrap();
        let wm_base = client.bind_xdg_wm_base(u32::MAX).unwrap();
        Rc::new(Self {
            state,
            client,
            compositor,
            subcompositor,
            wm_base,
            seat,
            policy,
            sink,
            importer,
            surfaces: Default::default(),
        })
    }

    pub fn surface(&self) -> TestResult<Rc<WlSurface>> {
        let surface = self
            .compositor
            .create_surface()
            .with_context(|| "Could not create a surface")?;
        self.surfaces.borrow_mut().push(Rc::downgrade(&surface));
        Ok(surface)
    }

    pub fn buffer(&self, width: i32, height: i32) -> TestResult<Rc<WlBuffer>> {
        self.client
            .create_buffer(width, height)
            .with_context(|| "Could not create a buffer")
    }

    pub fn subsurface(
        &self,
        parent: &Rc<WlSurface>,
    ) -> TestResult<(Rc<WlSurface>, Rc<WlSubsurface>)> {
        let surface = self.surface()?;
        let ss = self
            .subcompositor
            .get_subsurface(&surface, parent)
            .with_context(|| "Could not create a subsurface")?;
        Ok((surface, ss))
    }

    /// Attaches a fresh buffer of the given size and commits.
    pub fn commit_buffer(&self, surface: &Rc<WlSurface>, width: i32, height: i32) -> TestResult {
        let buffer = self.buffer(width, height)?;
        surface.attach(Some(&buffer), 0, 0);
        surface.commit().with_context(|| "Could not commit")
    }

    /// Creates a toplevel that has received, but not acked, its initial
    /// configure.
    pub fn toplevel(&self) -> TestResult<TestWindow> {
        let surface = self.surface()?;
        let xdg = self.wm_base.get_xdg_surface(&surface)?;
        let toplevel = xdg.get_toplevel()?;
        Ok(TestWindow {
            surface,
            xdg,
            toplevel,
        })
    }

    pub fn map_toplevel(&self, width: i32, height: i32) -> TestResult<TestWindow> {
        let window = self.toplevel()?;
        self.ack_latest(&window.xdg)?;
        self.commit_buffer(&window.surface, width, height)?;
        Ok(window)
    }

    pub fn positioner(
        &self,
        width: i32,
        height: i32,
        anchor_rect: (i32, i32, i32, i32),
    ) -> TestResult<Rc<XdgPositioner>> {
        let pos = self.wm_base.create_positioner()?;
        pos.set_size(width, height)?;
        let (x, y, w, h) = anchor_rect;
        pos.set_anchor_rect(x, y, w, h)?;
        Ok(pos)
    }

    pub fn map_popup(
        &self,
        parent: &Rc<XdgSurface>,
        positioner: &Rc<XdgPositioner>,
    ) -> TestResult<TestPopup> {
        let surface = self.surface()?;
        let xdg = self.wm_base.get_xdg_surface(&surface)?;
        let popup = xdg.get_popup(Some(parent), positioner)?;
        self.ack_latest(&xdg)?;
        let (width, height) = popup.relative_position().size();
        self.commit_buffer(&surface, width, height)?;
        Ok(TestPopup {
            surface,
            xdg,
            popup,
        })
    }

    pub fn ack_latest(&self, xdg: &XdgSurface) -> TestResult {
        let Some(serial) = xdg.outstanding_serials().last().copied() else {
            bail!("xdg_surface@{} has no outstanding configure", xdg.id);
        };
        xdg.ack_configure(serial)
            .with_context(|| "Could not ack the configure")
    }

    /// Moves the pointer onto `surface` and clicks.
    pub fn click(&self, surface: &Rc<WlSurface>) {
        self.seat.pointer_enter(surface, 0.0, 0.0);
        self.seat.pointer_button(0, BTN_LEFT, ButtonState::Pressed);
        self.seat.pointer_button(0, BTN_LEFT, ButtonState::Released);
    }

    pub fn events(&self) -> Vec<Event> {
        self.client.take_events()
    }

    /// The protocol error posted to the client, if any. Consumes the queued
    /// events.
    pub fn protocol_error(&self) -> Option<(ObjectId, u32)> {
        self.events().into_iter().find_map(|e| match e {
            Event::Error { object, code, .. } => Some((object, code)),
            _ => None,
        })
    }

    pub fn destroy(&self) {
        self.state.destroy_client(self.client.id);
    }

    pub fn has_leaks(&self) -> bool {
        self.surfaces
            .borrow()
            .iter()
            .any(|s| s.strong_count() > 0)
    }
}

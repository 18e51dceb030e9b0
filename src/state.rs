use {
    crate::{
        client::{Client, ClientId, ClientIds},
        config::ShellConfig,
        gfx_api::{BufferImporter, NullImporter},
        logger::Logger,
        ifs::wl_seat::{
            InputSink, SeatCapabilities, SeatId, SeatIds, WlSeatGlobal,
            popup_grab::PopupGrabIds,
        },
        policy::{NoopPolicy, ShellPolicy},
        utils::{clonecell::CloneCell, copyhashmap::CopyHashMap},
    },
    std::{cell::Cell, rc::Rc, sync::Arc},
};

pub struct State {
    pub config: ShellConfig,
    serial: Cell<u32>,
    pub client_ids: ClientIds,
    pub seat_ids: SeatIds,
    pub popup_grab_ids: PopupGrabIds,
    pub clients: CopyHashMap<ClientId, Rc<Client>>,
    pub seats: CopyHashMap<SeatId, Rc<WlSeatGlobal>>,
    pub importer: CloneCell<Rc<dyn BufferImporter>>,
    pub policy: CloneCell<Rc<dyn ShellPolicy>>,
    pub logger: CloneCell<Option<Arc<Logger>>>,
}

impl State {
    pub fn new(config: ShellConfig) -> Rc<Self> {
        Rc::new(Self {
            config,
            serial: Cell::new(1),
            client_ids: Default::default(),
            seat_ids: Default::default(),
            popup_grab_ids: Default::default(),
            clients: Default::default(),
            seats: Default::default(),
            importer: CloneCell::new(Rc::new(NullImporter::default())),
            policy: CloneCell::new(Rc::new(NoopPolicy)),
            logger: Default::default(),
        })
    }

    pub fn next_serial(&self) -> u32 {
        let serial = self.serial.get();
        self.serial.set(serial.wrapping_add(1));
        serial
    }

    pub fn set_importer(&self, importer: Rc<dyn BufferImporter>) {
        self.importer.set(importer);
    }

    pub fn set_policy(&self, policy: Rc<dyn ShellPolicy>) {
        self.policy.set(policy);
    }

    /// Adopts `logger` and applies the configured log level to it.
    pub fn set_logger(&self, logger: Arc<Logger>) {
        logger.set_level(self.config.log_level);
        self.logger.set(Some(logger));
    }

    pub fn create_client(self: &Rc<Self>) -> Rc<Client> {
        let client = Client::new(self.client_ids.next(), self);
        log::info!("Client {} connected", client.id);
        self.clients.set(client.id, client.clone());
        client
    }

    pub fn destroy_client(&self, id: ClientId) {
        if let Some(client) = self.clients.remove(&id) {
            log::info!("Client {} disconnected", id);
            for seat in self.seats.values() {
                seat.client_destroyed(id);
            }
            client.destroy();
        }
    }

    pub fn create_seat(
        self: &Rc<Self>,
        name: &str,
        capabilities: SeatCapabilities,
        sink: Rc<dyn InputSink>,
    ) -> Rc<WlSeatGlobal> {
        let seat = WlSeatGlobal::new(self.seat_ids.next(), name, capabilities, sink);
        self.seats.set(seat.id, seat.clone());
        seat
    }
}

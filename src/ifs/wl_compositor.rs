use {
    crate::{
        client::{Client, ClientError},
        ifs::{wl_region::WlRegion, wl_surface::WlSurface},
        object::{Object, WL_COMPOSITOR},
        wire::WlCompositorId,
    },
    std::rc::Rc,
    thiserror::Error,
};

pub struct WlCompositor {
    pub id: WlCompositorId,
    client: Rc<Client>,
}

impl WlCompositor {
    pub fn new(id: WlCompositorId, client: &Rc<Client>) -> Self {
        Self {
            id,
            client: client.clone(),
        }
    }

    pub fn create_surface(&self) -> Result<Rc<WlSurface>, WlCompositorError> {
        let surface = WlSurface::new(self.client.new_id(), &self.client);
        self.client.add_client_obj(&surface)?;
        log::debug!("Client {} created wl_surface@{}", self.client.id, surface.id);
        Ok(surface)
    }

    pub fn create_region(&self) -> Result<Rc<WlRegion>, WlCompositorError> {
        let region = Rc::new(WlRegion::new(self.client.new_id(), &self.client));
        self.client.add_client_obj(&region)?;
        Ok(region)
    }
}

object_base!(WlCompositor, WL_COMPOSITOR);

impl Object for WlCompositor {}

#[derive(Debug, Error)]
pub enum WlCompositorError {
    #[error(transparent)]
    ClientError(Box<ClientError>),
}
efrom!(WlCompositorError, ClientError);

use {
    crate::{
        client::{Client, ClientError},
        ifs::wl_surface::{
            WlSurface,
            wl_subsurface::{WlSubsurface, WlSubsurfaceError},
        },
        object::{Object, WL_SUBCOMPOSITOR},
        wire::WlSubcompositorId,
    },
    std::rc::Rc,
    thiserror::Error,
};

pub struct WlSubcompositor {
    pub id: WlSubcompositorId,
    client: Rc<Client>,
}

impl WlSubcompositor {
    pub fn new(id: WlSubcompositorId, client: &Rc<Client>) -> Self {
        Self {
            id,
            client: client.clone(),
        }
    }

    pub fn destroy(&self) -> Result<(), WlSubcompositorError> {
        self.client.remove_obj(self)?;
        Ok(())
    }

    pub fn get_subsurface(
        &self,
        surface: &Rc<WlSurface>,
        parent: &Rc<WlSurface>,
    ) -> Result<Rc<WlSubsurface>, WlSubcompositorError> {
        let subsurface = Rc::new(WlSubsurface::new(self.client.new_id(), surface, parent));
        self.client.add_client_obj(&subsurface)?;
        if let Err(e) = subsurface.install() {
            let _ = self.client.remove_obj(&*subsurface);
            let code = WlSubsurface::install_error_code(&e);
            return Err(self.client.fail(&*subsurface, code, e).into());
        }
        Ok(subsurface)
    }
}

object_base!(WlSubcompositor, WL_SUBCOMPOSITOR);

impl Object for WlSubcompositor {}

#[derive(Debug, Error)]
pub enum WlSubcompositorError {
    #[error(transparent)]
    ClientError(Box<ClientError>),
    #[error("Could not create a subsurface")]
    SubsurfaceError(#[source] Box<WlSubsurfaceError>),
}
efrom!(WlSubcompositorError, ClientError);
efrom!(WlSubcompositorError, SubsurfaceError, WlSubsurfaceError);

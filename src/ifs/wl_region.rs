use {
    crate::{
        client::{Client, ClientError},
        object::{Object, WL_REGION},
        rect::{Rect, Region, RegionBuilder},
        wire::WlRegionId,
    },
    std::{cell::RefCell, rc::Rc},
    thiserror::Error,
};

const INVALID_EXTENTS: u32 = 0;

pub struct WlRegion {
    pub id: WlRegionId,
    client: Rc<Client>,
    region: RefCell<RegionBuilder>,
}

impl WlRegion {
    pub fn new(id: WlRegionId, client: &Rc<Client>) -> Self {
        Self {
            id,
            client: client.clone(),
            region: Default::default(),
        }
    }

    pub fn region(&self) -> Rc<Region> {
        self.region.borrow_mut().get()
    }

    fn rect(&self, x: i32, y: i32, width: i32, height: i32) -> Result<Rect, WlRegionError> {
        match Rect::new_sized(x, y, width, height) {
            Some(r) => Ok(r),
            None => Err(self
                .client
                .fail(self, INVALID_EXTENTS, WlRegionError::NegativeExtents)),
        }
    }

    pub fn add(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), WlRegionError> {
        let rect = self.rect(x, y, width, height)?;
        self.region.borrow_mut().add(rect);
        Ok(())
    }

    pub fn subtract(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), WlRegionError> {
        let rect = self.rect(x, y, width, height)?;
        self.region.borrow_mut().sub(rect);
        Ok(())
    }

    pub fn destroy(&self) -> Result<(), WlRegionError> {
        self.client.remove_obj(self)?;
        Ok(())
    }
}

object_base!(WlRegion, WL_REGION);

impl Object for WlRegion {}

#[derive(Debug, Error)]
pub enum WlRegionError {
    #[error(transparent)]
    ClientError(Box<ClientError>),
    #[error("width and/or height are negative")]
    NegativeExtents,
}
efrom!(WlRegionError, ClientError);

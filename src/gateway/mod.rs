//! Gateway dispatcher - maps local routes onto vendor endpoints
//!
//! - `mapping`: parameter specs and form building
//! - `endpoints`: the static route table

pub mod endpoints;
pub mod mapping;

pub use self::endpoints::ENDPOINTS;
pub use self::mapping::{ApiGroup, EndpointMapping, RequestInput};

use std::sync::Arc;

use crate::netatmo::VendorApi;

/// Shared handler state
#[derive(Clone)]
pub struct GatewayState {
    pub vendor: Arc<dyn VendorApi>,
}

impl GatewayState {
    pub fn new(vendor: Arc<dyn VendorApi>) -> Self {
        Self { vendor }
    }
}

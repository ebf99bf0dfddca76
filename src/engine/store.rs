use crate::{
    dataset::{Dataset, ServerRecord},
    domain::{DedicatedSubnet, InterfacePort, PortChannel, PrivateNetwork, Service},
};

use super::error::{EngineError, EngineResult};

/// Seeded records plus the ID counter. Only reachable through the engine lock.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) services: Vec<Service>,
    pub(crate) servers: Vec<ServerRecord>,
    pub(crate) dedicated_subnets: Vec<DedicatedSubnet>,
    pub(crate) private_networks: Vec<PrivateNetwork>,
    generated_id: i64,
}

impl Store {
    pub fn from_dataset(dataset: Dataset) -> Self {
        let generated_id = dataset.generated_id.max(dataset.max_numeric_id());
        Self {
            services: dataset.services,
            servers: dataset.servers,
            dedicated_subnets: dataset.dedicated_subnets,
            private_networks: dataset.private_networks,
            generated_id,
        }
    }

    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            services: self.services.clone(),
            servers: self.servers.clone(),
            dedicated_subnets: self.dedicated_subnets.clone(),
            private_networks: self.private_networks.clone(),
            generated_id: self.generated_id,
        }
    }

    pub fn generated_id(&self) -> i64 {
        self.generated_id
    }

    /// Mints the next ID. Shared by every entity kind. The counter is left
    /// untouched once it has reached `i64::MAX`.
    pub fn next_id(&mut self) -> EngineResult<i64> {
        self.generated_id = self
            .generated_id
            .checked_add(1)
            .ok_or_else(|| EngineError::internal("id counter exhausted"))?;
        Ok(self.generated_id)
    }

    pub fn find_service(&self, service_id: &str) -> EngineResult<&Service> {
        self.services
            .iter()
            .find(|s| s.service_id == service_id)
            .ok_or_else(|| EngineError::not_found("service", service_id))
    }

    pub fn find_service_mut(&mut self, service_id: &str) -> EngineResult<&mut Service> {
        self.services
            .iter_mut()
            .find(|s| s.service_id == service_id)
            .ok_or_else(|| EngineError::not_found("service", service_id))
    }

    pub fn find_server(&self, server_id: &str) -> EngineResult<&ServerRecord> {
        self.servers
            .iter()
            .find(|r| r.server.server_id == server_id)
            .ok_or_else(|| EngineError::not_found("server", server_id))
    }

    pub fn find_server_mut(&mut self, server_id: &str) -> EngineResult<&mut ServerRecord> {
        self.servers
            .iter_mut()
            .find(|r| r.server.server_id == server_id)
            .ok_or_else(|| EngineError::not_found("server", server_id))
    }

    pub fn find_dedicated_subnet(&self, subnet_id: &str) -> EngineResult<&DedicatedSubnet> {
        self.dedicated_subnets
            .iter()
            .find(|s| s.dedicated_subnet_id == subnet_id)
            .ok_or_else(|| EngineError::not_found("dedicated-subnet", subnet_id))
    }

    pub fn find_private_network(&self, network_id: &str) -> EngineResult<&PrivateNetwork> {
        self.private_networks
            .iter()
            .find(|n| n.private_network_id == network_id)
            .ok_or_else(|| EngineError::not_found("private-network", network_id))
    }
}

impl ServerRecord {
    fn scope(&self) -> String {
        format!("server[{}]", self.server.server_id)
    }

    pub fn port(&self, port_id: i64) -> EngineResult<&InterfacePort> {
        self.server
            .ports
            .iter()
            .find(|p| p.port_id == port_id)
            .ok_or_else(|| EngineError::not_found_in("port", port_id, self.scope()))
    }

    pub fn port_mut(&mut self, port_id: i64) -> EngineResult<&mut InterfacePort> {
        let scope = self.scope();
        self.server
            .ports
            .iter_mut()
            .find(|p| p.port_id == port_id)
            .ok_or_else(|| EngineError::not_found_in("port", port_id, scope))
    }

    pub fn port_channel(&self, port_channel_id: i64) -> EngineResult<&PortChannel> {
        self.server
            .port_channels
            .iter()
            .find(|pc| pc.port_channel_id == port_channel_id)
            .ok_or_else(|| EngineError::not_found_in("port-channel", port_channel_id, self.scope()))
    }

    pub fn port_channel_mut(&mut self, port_channel_id: i64) -> EngineResult<&mut PortChannel> {
        let scope = self.scope();
        self.server
            .port_channels
            .iter_mut()
            .find(|pc| pc.port_channel_id == port_channel_id)
            .ok_or_else(|| EngineError::not_found_in("port-channel", port_channel_id, scope))
    }
}

//! Operation traits served by the HTTP layer. Implemented by [`Engine`] and by
//! [`crate::stub::StubBackend`].

use std::{future::Future, pin::Pin};

use crate::{
    domain::{
        AssignNetworkParameter, ConfigureBondingParameter, DedicatedSubnet, DedicatedSubnets,
        EnableServerPortParameter, InterfacePort, ListParams, OsImage, OsInstallParameter,
        PortChannel, PowerControlParameter, PrivateNetwork, PrivateNetworks, RaidStatus,
        RaidStatusParams, Server, ServerPowerStatus, Servers, Service, Services, TrafficGraph,
        TrafficGraphParams, UpdateServerPortParameter, UpdateServiceParameter,
    },
    engine::{Engine, EngineResult},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ServiceApi: Send + Sync + 'static {
    fn list_services(&self, params: ListParams) -> BoxFuture<'_, EngineResult<Services>>;

    fn read_service(&self, service_id: String) -> BoxFuture<'_, EngineResult<Service>>;

    fn update_service(
        &self,
        service_id: String,
        params: UpdateServiceParameter,
    ) -> BoxFuture<'_, EngineResult<Service>>;
}

pub trait ServerApi: Send + Sync + 'static {
    fn list_servers(&self, params: ListParams) -> BoxFuture<'_, EngineResult<Servers>>;

    fn read_server(&self, server_id: String) -> BoxFuture<'_, EngineResult<Server>>;

    fn list_os_images(&self, server_id: String) -> BoxFuture<'_, EngineResult<Vec<OsImage>>>;

    fn os_install(
        &self,
        server_id: String,
        params: OsInstallParameter,
    ) -> BoxFuture<'_, EngineResult<()>>;

    fn read_port_channel(
        &self,
        server_id: String,
        port_channel_id: i64,
    ) -> BoxFuture<'_, EngineResult<PortChannel>>;

    fn configure_bonding(
        &self,
        server_id: String,
        port_channel_id: i64,
        params: ConfigureBondingParameter,
    ) -> BoxFuture<'_, EngineResult<PortChannel>>;

    fn read_port(
        &self,
        server_id: String,
        port_id: i64,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>>;

    fn update_port(
        &self,
        server_id: String,
        port_id: i64,
        params: UpdateServerPortParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>>;

    fn assign_network(
        &self,
        server_id: String,
        port_id: i64,
        params: AssignNetworkParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>>;

    fn enable_port(
        &self,
        server_id: String,
        port_id: i64,
        params: EnableServerPortParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>>;

    fn read_traffic_by_port(
        &self,
        server_id: String,
        port_id: i64,
        params: TrafficGraphParams,
    ) -> BoxFuture<'_, EngineResult<TrafficGraph>>;

    fn power_control(
        &self,
        server_id: String,
        params: PowerControlParameter,
    ) -> BoxFuture<'_, EngineResult<()>>;

    fn read_power_status(
        &self,
        server_id: String,
    ) -> BoxFuture<'_, EngineResult<ServerPowerStatus>>;

    fn read_raid_status(
        &self,
        server_id: String,
        params: RaidStatusParams,
    ) -> BoxFuture<'_, EngineResult<RaidStatus>>;
}

pub trait DedicatedSubnetApi: Send + Sync + 'static {
    fn list_dedicated_subnets(
        &self,
        params: ListParams,
    ) -> BoxFuture<'_, EngineResult<DedicatedSubnets>>;

    fn read_dedicated_subnet(
        &self,
        subnet_id: String,
    ) -> BoxFuture<'_, EngineResult<DedicatedSubnet>>;
}

pub trait PrivateNetworkApi: Send + Sync + 'static {
    fn list_private_networks(
        &self,
        params: ListParams,
    ) -> BoxFuture<'_, EngineResult<PrivateNetworks>>;

    fn read_private_network(
        &self,
        network_id: String,
    ) -> BoxFuture<'_, EngineResult<PrivateNetwork>>;
}

/// Everything the HTTP router needs, as one trait object.
pub trait PhyBackend: ServiceApi + ServerApi + DedicatedSubnetApi + PrivateNetworkApi {}

impl<T> PhyBackend for T where T: ServiceApi + ServerApi + DedicatedSubnetApi + PrivateNetworkApi {}

impl ServiceApi for Engine {
    fn list_services(&self, params: ListParams) -> BoxFuture<'_, EngineResult<Services>> {
        Box::pin(Engine::list_services(self, params))
    }

    fn read_service(&self, service_id: String) -> BoxFuture<'_, EngineResult<Service>> {
        Box::pin(async move { Engine::read_service(self, &service_id).await })
    }

    fn update_service(
        &self,
        service_id: String,
        params: UpdateServiceParameter,
    ) -> BoxFuture<'_, EngineResult<Service>> {
        Box::pin(async move { Engine::update_service(self, &service_id, params).await })
    }
}

impl ServerApi for Engine {
    fn list_servers(&self, params: ListParams) -> BoxFuture<'_, EngineResult<Servers>> {
        Box::pin(Engine::list_servers(self, params))
    }

    fn read_server(&self, server_id: String) -> BoxFuture<'_, EngineResult<Server>> {
        Box::pin(async move { Engine::read_server(self, &server_id).await })
    }

    fn list_os_images(&self, server_id: String) -> BoxFuture<'_, EngineResult<Vec<OsImage>>> {
        Box::pin(async move { Engine::list_os_images(self, &server_id).await })
    }

    fn os_install(
        &self,
        server_id: String,
        params: OsInstallParameter,
    ) -> BoxFuture<'_, EngineResult<()>> {
        Box::pin(async move { Engine::os_install(self, &server_id, params).await })
    }

    fn read_port_channel(
        &self,
        server_id: String,
        port_channel_id: i64,
    ) -> BoxFuture<'_, EngineResult<PortChannel>> {
        Box::pin(async move { Engine::read_port_channel(self, &server_id, port_channel_id).await })
    }

    fn configure_bonding(
        &self,
        server_id: String,
        port_channel_id: i64,
        params: ConfigureBondingParameter,
    ) -> BoxFuture<'_, EngineResult<PortChannel>> {
        Box::pin(async move {
            Engine::configure_bonding(self, &server_id, port_channel_id, params).await
        })
    }

    fn read_port(
        &self,
        server_id: String,
        port_id: i64,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>> {
        Box::pin(async move { Engine::read_port(self, &server_id, port_id).await })
    }

    fn update_port(
        &self,
        server_id: String,
        port_id: i64,
        params: UpdateServerPortParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>> {
        Box::pin(async move { Engine::update_port(self, &server_id, port_id, params).await })
    }

    fn assign_network(
        &self,
        server_id: String,
        port_id: i64,
        params: AssignNetworkParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>> {
        Box::pin(async move { Engine::assign_network(self, &server_id, port_id, params).await })
    }

    fn enable_port(
        &self,
        server_id: String,
        port_id: i64,
        params: EnableServerPortParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>> {
        Box::pin(async move { Engine::enable_port(self, &server_id, port_id, params).await })
    }

    fn read_traffic_by_port(
        &self,
        server_id: String,
        port_id: i64,
        params: TrafficGraphParams,
    ) -> BoxFuture<'_, EngineResult<TrafficGraph>> {
        Box::pin(async move {
            Engine::read_traffic_by_port(self, &server_id, port_id, params).await
        })
    }

    fn power_control(
        &self,
        server_id: String,
        params: PowerControlParameter,
    ) -> BoxFuture<'_, EngineResult<()>> {
        Box::pin(async move { Engine::power_control(self, &server_id, params).await })
    }

    fn read_power_status(
        &self,
        server_id: String,
    ) -> BoxFuture<'_, EngineResult<ServerPowerStatus>> {
        Box::pin(async move { Engine::read_power_status(self, &server_id).await })
    }

    fn read_raid_status(
        &self,
        server_id: String,
        params: RaidStatusParams,
    ) -> BoxFuture<'_, EngineResult<RaidStatus>> {
        Box::pin(async move { Engine::read_raid_status(self, &server_id, params).await })
    }
}

impl DedicatedSubnetApi for Engine {
    fn list_dedicated_subnets(
        &self,
        params: ListParams,
    ) -> BoxFuture<'_, EngineResult<DedicatedSubnets>> {
        Box::pin(Engine::list_dedicated_subnets(self, params))
    }

    fn read_dedicated_subnet(
        &self,
        subnet_id: String,
    ) -> BoxFuture<'_, EngineResult<DedicatedSubnet>> {
        Box::pin(async move { Engine::read_dedicated_subnet(self, &subnet_id).await })
    }
}

impl PrivateNetworkApi for Engine {
    fn list_private_networks(
        &self,
        params: ListParams,
    ) -> BoxFuture<'_, EngineResult<PrivateNetworks>> {
        Box::pin(Engine::list_private_networks(self, params))
    }

    fn read_private_network(
        &self,
        network_id: String,
    ) -> BoxFuture<'_, EngineResult<PrivateNetwork>> {
        Box::pin(async move { Engine::read_private_network(self, &network_id).await })
    }
}

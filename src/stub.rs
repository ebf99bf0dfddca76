//! Backend whose answers are scripted per operation. Used to drive the HTTP
//! layer through responses the engine never produces (server errors, odd
//! payloads).

use std::{future::ready, sync::Arc};

use crate::{
    api::{BoxFuture, DedicatedSubnetApi, PrivateNetworkApi, ServerApi, ServiceApi},
    domain::{
        AssignNetworkParameter, ConfigureBondingParameter, DedicatedSubnet, DedicatedSubnets,
        EnableServerPortParameter, InterfacePort, ListParams, OsImage, OsInstallParameter,
        PortChannel, PowerControlParameter, PrivateNetwork, PrivateNetworks, RaidStatus,
        RaidStatusParams, Server, ServerPowerStatus, Servers, Service, Services, TrafficGraph,
        TrafficGraphParams, UpdateServerPortParameter, UpdateServiceParameter,
    },
    engine::{EngineError, EngineResult},
};

type Handler<A, T> = Arc<dyn Fn(A) -> EngineResult<T> + Send + Sync>;

fn call<A, T>(handler: &Option<Handler<A, T>>, operation: &'static str, args: A) -> EngineResult<T> {
    match handler {
        Some(handler) => handler(args),
        None => Err(EngineError::internal(format!(
            "operation is not stubbed: {operation}"
        ))),
    }
}

macro_rules! stub_handlers {
    ($($field:ident / $setter:ident: $args:ty => $out:ty;)*) => {
        /// Every operation starts unset and answers with an internal error.
        #[derive(Clone, Default)]
        pub struct StubBackend {
            $($field: Option<Handler<$args, $out>>,)*
        }

        impl StubBackend {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $setter<F>(mut self, handler: F) -> Self
                where
                    F: Fn($args) -> EngineResult<$out> + Send + Sync + 'static,
                {
                    self.$field = Some(Arc::new(handler));
                    self
                }
            )*
        }
    };
}

stub_handlers! {
    list_services / with_list_services: ListParams => Services;
    read_service / with_read_service: String => Service;
    update_service / with_update_service: (String, UpdateServiceParameter) => Service;
    list_servers / with_list_servers: ListParams => Servers;
    read_server / with_read_server: String => Server;
    list_os_images / with_list_os_images: String => Vec<OsImage>;
    os_install / with_os_install: (String, OsInstallParameter) => ();
    read_port_channel / with_read_port_channel: (String, i64) => PortChannel;
    configure_bonding / with_configure_bonding: (String, i64, ConfigureBondingParameter) => PortChannel;
    read_port / with_read_port: (String, i64) => InterfacePort;
    update_port / with_update_port: (String, i64, UpdateServerPortParameter) => InterfacePort;
    assign_network / with_assign_network: (String, i64, AssignNetworkParameter) => InterfacePort;
    enable_port / with_enable_port: (String, i64, EnableServerPortParameter) => InterfacePort;
    read_traffic_by_port / with_read_traffic_by_port: (String, i64, TrafficGraphParams) => TrafficGraph;
    power_control / with_power_control: (String, PowerControlParameter) => ();
    read_power_status / with_read_power_status: String => ServerPowerStatus;
    read_raid_status / with_read_raid_status: (String, RaidStatusParams) => RaidStatus;
    list_dedicated_subnets / with_list_dedicated_subnets: ListParams => DedicatedSubnets;
    read_dedicated_subnet / with_read_dedicated_subnet: String => DedicatedSubnet;
    list_private_networks / with_list_private_networks: ListParams => PrivateNetworks;
    read_private_network / with_read_private_network: String => PrivateNetwork;
}

impl ServiceApi for StubBackend {
    fn list_services(&self, params: ListParams) -> BoxFuture<'_, EngineResult<Services>> {
        Box::pin(ready(call(&self.list_services, "list_services", params)))
    }

    fn read_service(&self, service_id: String) -> BoxFuture<'_, EngineResult<Service>> {
        Box::pin(ready(call(&self.read_service, "read_service", service_id)))
    }

    fn update_service(
        &self,
        service_id: String,
        params: UpdateServiceParameter,
    ) -> BoxFuture<'_, EngineResult<Service>> {
        Box::pin(ready(call(
            &self.update_service,
            "update_service",
            (service_id, params),
        )))
    }
}

impl ServerApi for StubBackend {
    fn list_servers(&self, params: ListParams) -> BoxFuture<'_, EngineResult<Servers>> {
        Box::pin(ready(call(&self.list_servers, "list_servers", params)))
    }

    fn read_server(&self, server_id: String) -> BoxFuture<'_, EngineResult<Server>> {
        Box::pin(ready(call(&self.read_server, "read_server", server_id)))
    }

    fn list_os_images(&self, server_id: String) -> BoxFuture<'_, EngineResult<Vec<OsImage>>> {
        Box::pin(ready(call(&self.list_os_images, "list_os_images", server_id)))
    }

    fn os_install(
        &self,
        server_id: String,
        params: OsInstallParameter,
    ) -> BoxFuture<'_, EngineResult<()>> {
        Box::pin(ready(call(&self.os_install, "os_install", (server_id, params))))
    }

    fn read_port_channel(
        &self,
        server_id: String,
        port_channel_id: i64,
    ) -> BoxFuture<'_, EngineResult<PortChannel>> {
        Box::pin(ready(call(
            &self.read_port_channel,
            "read_port_channel",
            (server_id, port_channel_id),
        )))
    }

    fn configure_bonding(
        &self,
        server_id: String,
        port_channel_id: i64,
        params: ConfigureBondingParameter,
    ) -> BoxFuture<'_, EngineResult<PortChannel>> {
        Box::pin(ready(call(
            &self.configure_bonding,
            "configure_bonding",
            (server_id, port_channel_id, params),
        )))
    }

    fn read_port(
        &self,
        server_id: String,
        port_id: i64,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>> {
        Box::pin(ready(call(&self.read_port, "read_port", (server_id, port_id))))
    }

    fn update_port(
        &self,
        server_id: String,
        port_id: i64,
        params: UpdateServerPortParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>> {
        Box::pin(ready(call(
            &self.update_port,
            "update_port",
            (server_id, port_id, params),
        )))
    }

    fn assign_network(
        &self,
        server_id: String,
        port_id: i64,
        params: AssignNetworkParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>> {
        Box::pin(ready(call(
            &self.assign_network,
            "assign_network",
            (server_id, port_id, params),
        )))
    }

    fn enable_port(
        &self,
        server_id: String,
        port_id: i64,
        params: EnableServerPortParameter,
    ) -> BoxFuture<'_, EngineResult<InterfacePort>> {
        Box::pin(ready(call(
            &self.enable_port,
            "enable_port",
            (server_id, port_id, params),
        )))
    }

    fn read_traffic_by_port(
        &self,
        server_id: String,
        port_id: i64,
        params: TrafficGraphParams,
    ) -> BoxFuture<'_, EngineResult<TrafficGraph>> {
        Box::pin(ready(call(
            &self.read_traffic_by_port,
            "read_traffic_by_port",
            (server_id, port_id, params),
        )))
    }

    fn power_control(
        &self,
        server_id: String,
        params: PowerControlParameter,
    ) -> BoxFuture<'_, EngineResult<()>> {
        Box::pin(ready(call(
            &self.power_control,
            "power_control",
            (server_id, params),
        )))
    }

    fn read_power_status(
        &self,
        server_id: String,
    ) -> BoxFuture<'_, EngineResult<ServerPowerStatus>> {
        Box::pin(ready(call(
            &self.read_power_status,
            "read_power_status",
            server_id,
        )))
    }

    fn read_raid_status(
        &self,
        server_id: String,
        params: RaidStatusParams,
    ) -> BoxFuture<'_, EngineResult<RaidStatus>> {
        Box::pin(ready(call(
            &self.read_raid_status,
            "read_raid_status",
            (server_id, params),
        )))
    }
}

impl DedicatedSubnetApi for StubBackend {
    fn list_dedicated_subnets(
        &self,
        params: ListParams,
    ) -> BoxFuture<'_, EngineResult<DedicatedSubnets>> {
        Box::pin(ready(call(
            &self.list_dedicated_subnets,
            "list_dedicated_subnets",
            params,
        )))
    }

    fn read_dedicated_subnet(
        &self,
        subnet_id: String,
    ) -> BoxFuture<'_, EngineResult<DedicatedSubnet>> {
        Box::pin(ready(call(
            &self.read_dedicated_subnet,
            "read_dedicated_subnet",
            subnet_id,
        )))
    }
}

impl PrivateNetworkApi for StubBackend {
    fn list_private_networks(
        &self,
        params: ListParams,
    ) -> BoxFuture<'_, EngineResult<PrivateNetworks>> {
        Box::pin(ready(call(
            &self.list_private_networks,
            "list_private_networks",
            params,
        )))
    }

    fn read_private_network(
        &self,
        network_id: String,
    ) -> BoxFuture<'_, EngineResult<PrivateNetwork>> {
        Box::pin(ready(call(
            &self.read_private_network,
            "read_private_network",
            network_id,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PowerOperation, PowerState},
        engine::ErrorKind,
    };

    #[tokio::test]
    async fn unset_operations_are_internal_errors() {
        let stub = StubBackend::new();
        let err = stub.read_server("1".to_string()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(
            err.to_string(),
            "internal error: operation is not stubbed: read_server"
        );
    }

    #[tokio::test]
    async fn handlers_receive_their_arguments() {
        let stub = StubBackend::new()
            .with_read_power_status(|server_id| {
                assert_eq!(server_id, "100000000001");
                Ok(ServerPowerStatus {
                    status: PowerState::Off,
                })
            })
            .with_power_control(|(server_id, params)| {
                Err(EngineError::conflict(
                    "server",
                    server_id,
                    format!("{:?} refused", params.operation),
                ))
            });

        let status = stub
            .read_power_status("100000000001".to_string())
            .await
            .unwrap();
        assert_eq!(status.status, PowerState::Off);

        let err = stub
            .power_control(
                "100000000001".to_string(),
                PowerControlParameter {
                    operation: PowerOperation::Soft,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.to_string().contains("Soft refused"));
    }
}

use crate::domain::{ListParams, Service, Services, UpdateServiceParameter};

use super::{Engine, EngineResult, paginate};

impl Engine {
    pub async fn list_services(&self, params: ListParams) -> EngineResult<Services> {
        let store = self.store.read().await;
        let (meta, services) = paginate(&store.services, params);
        Ok(Services { meta, services })
    }

    pub async fn read_service(&self, service_id: &str) -> EngineResult<Service> {
        let store = self.store.read().await;
        store.find_service(service_id).cloned()
    }

    /// Embedded `ServiceQuiet` views on servers and networks keep the old values.
    pub async fn update_service(
        &self,
        service_id: &str,
        params: UpdateServiceParameter,
    ) -> EngineResult<Service> {
        let mut store = self.store.write().await;
        let service = store.find_service_mut(service_id)?;
        if let Some(nickname) = params.nickname {
            service.nickname = nickname;
        }
        if let Some(description) = params.description {
            service.description = Some(description);
        }
        Ok(service.clone())
    }
}

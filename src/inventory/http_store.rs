//! HTTP implementation of the inventory store, speaking the remote API's
//! JSON dialect over blocking requests.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::{
    FactSheetHasParent, FactSheetHasRequires, InventoryError, InventoryStore, NewResource,
    NewService, Resource, Service, ServiceHasResource,
};

pub struct HttpInventoryStore {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpInventoryStore {
    pub fn new(base_url: &str, token: &str) -> HttpInventoryStore {
        HttpInventoryStore {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, InventoryError> {
        let response = self
            .prepare(self.client.get(self.url(path)).query(query))
            .send()?;

        read_json(response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, InventoryError> {
        let response = self
            .prepare(self.client.post(self.url(path)).json(body))
            .send()?;

        read_json(response)
    }

    fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, InventoryError> {
        let response = self
            .prepare(self.client.put(self.url(path)).json(body))
            .send()?;

        read_json(response)
    }

    fn delete(&self, path: &str) -> Result<(), InventoryError> {
        let response = self.prepare(self.client.delete(self.url(path))).send()?;

        check_status(response).map(|_| ())
    }
}

fn check_status(response: Response) -> Result<Response, InventoryError> {
    if !response.status().is_success() {
        return Err(InventoryError::Api {
            status: response.status(),
            body: response.text()?,
        });
    }

    Ok(response)
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, InventoryError> {
    Ok(check_status(response)?.json()?)
}

impl InventoryStore for HttpInventoryStore {
    fn find_services(&self, name_filter: &str) -> Result<Vec<Service>, InventoryError> {
        self.get_json("/services", &[("name", name_filter)])
    }

    fn create_service(&self, service: &NewService) -> Result<Service, InventoryError> {
        self.post_json("/services", service)
    }

    fn update_service(&self, id: &str, service: &NewService) -> Result<Service, InventoryError> {
        self.put_json(&format!("/services/{}", id), service)
    }

    fn find_resources(&self, name_filter: &str) -> Result<Vec<Resource>, InventoryError> {
        self.get_json("/resources", &[("name", name_filter)])
    }

    fn list_resources(&self) -> Result<Vec<Resource>, InventoryError> {
        self.get_json("/resources", &[])
    }

    fn get_resource(&self, id: &str) -> Result<Resource, InventoryError> {
        self.get_json(&format!("/resources/{}", id), &[])
    }

    fn create_resource(&self, resource: &NewResource) -> Result<Resource, InventoryError> {
        self.post_json("/resources", resource)
    }

    fn update_resource(
        &self,
        id: &str,
        resource: &NewResource,
    ) -> Result<Resource, InventoryError> {
        self.put_json(&format!("/resources/{}", id), resource)
    }

    fn service_resources(
        &self,
        service_id: &str,
    ) -> Result<Vec<ServiceHasResource>, InventoryError> {
        self.get_json(&format!("/services/{}/resources", service_id), &[])
    }

    fn create_service_resource(
        &self,
        service_id: &str,
        resource_id: &str,
    ) -> Result<ServiceHasResource, InventoryError> {
        self.post_json(
            &format!("/services/{}/resources", service_id),
            &json!({
                "serviceId": service_id,
                "resourceId": resource_id,
            }),
        )
    }

    fn delete_service_resource(
        &self,
        service_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError> {
        self.delete(&format!("/services/{}/resources/{}", service_id, relation_id))
    }

    fn resource_parents(
        &self,
        resource_id: &str,
    ) -> Result<Vec<FactSheetHasParent>, InventoryError> {
        self.get_json(&format!("/resources/{}/parents", resource_id), &[])
    }

    fn create_resource_parent(
        &self,
        child_id: &str,
        parent_id: &str,
    ) -> Result<FactSheetHasParent, InventoryError> {
        self.post_json(
            &format!("/resources/{}/parents", child_id),
            &json!({
                "factSheetId": child_id,
                "factSheetRefId": parent_id,
            }),
        )
    }

    fn delete_resource_parent(
        &self,
        resource_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError> {
        self.delete(&format!("/resources/{}/parents/{}", resource_id, relation_id))
    }

    fn resource_requires(
        &self,
        resource_id: &str,
    ) -> Result<Vec<FactSheetHasRequires>, InventoryError> {
        self.get_json(&format!("/resources/{}/requires", resource_id), &[])
    }

    fn create_resource_requires(
        &self,
        resource_id: &str,
        required_id: &str,
    ) -> Result<FactSheetHasRequires, InventoryError> {
        self.post_json(
            &format!("/resources/{}/requires", resource_id),
            &json!({
                "factSheetId": resource_id,
                "factSheetRefId": required_id,
            }),
        )
    }

    fn delete_resource_requires(
        &self,
        resource_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError> {
        self.delete(&format!("/resources/{}/requires/{}", resource_id, relation_id))
    }
}

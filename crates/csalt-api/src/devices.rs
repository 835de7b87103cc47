// Device name translation endpoint.

use tracing::debug;

use crate::client::UserApiClient;
use crate::error::Error;
use crate::models::{DeviceName, DeviceResponse};

impl UserApiClient {
    /// Translate group names and device names into devices with salt ids.
    ///
    /// `GET /api/v1/devices/query?groups=[..]&devices=[..]`, both parameters
    /// JSON-encoded. Requires a token; without one this fails with
    /// `Error::Authentication` before any request is sent.
    pub async fn translate_names(
        &self,
        groups: &[String],
        devices: &[DeviceName],
    ) -> Result<DeviceResponse, Error> {
        let authorization = self.authorization()?;
        let mut url = self.api_url("api/v1/devices/query")?;
        url.query_pairs_mut()
            .append_pair("groups", &serde_json::to_string(groups)?)
            .append_pair("devices", &serde_json::to_string(devices)?);

        debug!("GET {url}");

        let resp = self
            .http()
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(Error::Transport)?;

        let response: DeviceResponse = Self::parse_json(resp).await?;
        debug!(
            devices = response.devices.len(),
            name_matches = response.name_matches.len(),
            "translation complete"
        );
        Ok(response)
    }
}

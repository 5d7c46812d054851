//! Gallerist Helpers
//!
//! Gallerist creation and update together with its address.

use tracing::debug;

use crate::core::HttpTransport;
use crate::error::DealershipError;
use crate::services::{Addresses, Gallerists, ResourceApi, ResourceService};
use crate::types::{Gallerist, GalleristInput, GalleristWithAddressInput};
use crate::validation::Validate;

impl<T: HttpTransport> ResourceService<T, Gallerists> {
    fn addresses(&self) -> ResourceService<T, Addresses> {
        ResourceService::new(self.client().clone())
    }

    /// Create the address, then a gallerist referencing it.
    pub async fn create_with_address(
        &self,
        input: &GalleristWithAddressInput,
    ) -> Result<Gallerist, DealershipError> {
        input.validate()?;

        let address = self.addresses().create(&input.address).await?;
        debug!(address_id = %address.id, "Created address for new gallerist");

        self.create(&GalleristInput {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            address_id: Some(address.id),
        })
        .await
    }

    /// Update a gallerist, pointing it at `address_id` when given or at a
    /// newly created address otherwise.
    pub async fn update_with_address(
        &self,
        id: &str,
        input: &GalleristWithAddressInput,
        address_id: Option<&str>,
    ) -> Result<Gallerist, DealershipError> {
        input.validate()?;

        let address_id = match address_id.filter(|a| !a.trim().is_empty()) {
            Some(existing) => existing.to_string(),
            None => {
                let address = self.addresses().create(&input.address).await?;
                debug!(gallerist_id = %id, address_id = %address.id, "Created replacement address");
                address.id
            }
        };

        self.update(
            id,
            &GalleristInput {
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                address_id: Some(address_id),
            },
        )
        .await
    }
}

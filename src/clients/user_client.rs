//! Client for the user actor.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::clients::actor_client::ActorClient;
use crate::error::MarketError;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{User, UserCreate, UserId, UserUpdate};

#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<UserId, MarketError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(MarketError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, MarketError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(MarketError::from)
    }

    /// Boundary lookup for authenticated callers: absent accounts are not
    /// found, deactivated ones are forbidden.
    #[instrument(skip(self))]
    pub async fn find_active_by_email(&self, email: &str) -> Result<User, MarketError> {
        let users = self.inner.list().await.map_err(MarketError::from)?;
        let user = users
            .into_iter()
            .find(|user| user.email == email)
            .ok_or_else(|| MarketError::NotFound(format!("no account for {email}")))?;
        if !user.active {
            return Err(MarketError::Forbidden(format!(
                "account for {email} is inactive"
            )));
        }
        Ok(user)
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = MarketError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        MarketError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_list};
    use crate::model::Role;

    fn account(id: &str, email: &str, active: bool) -> User {
        User {
            id: id.to_string(),
            name: "Test".to_string(),
            email: email.to_string(),
            role: Role::Buyer,
            active,
        }
    }

    #[tokio::test]
    async fn find_by_email_distinguishes_missing_from_inactive() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let user_client = UserClient::new(client);

        let lookup = {
            let user_client = user_client.clone();
            tokio::spawn(async move { user_client.find_active_by_email("ghost@example.com").await })
        };
        let responder = expect_list(&mut receiver).await.expect("expected List");
        responder
            .send(Ok(vec![account("user_1", "alice@example.com", true)]))
            .unwrap();
        assert!(matches!(
            lookup.await.unwrap(),
            Err(MarketError::NotFound(_))
        ));

        let lookup = tokio::spawn(async move {
            user_client.find_active_by_email("alice@example.com").await
        });
        let responder = expect_list(&mut receiver).await.expect("expected List");
        responder
            .send(Ok(vec![account("user_1", "alice@example.com", false)]))
            .unwrap();
        assert!(matches!(
            lookup.await.unwrap(),
            Err(MarketError::Forbidden(_))
        ));
    }
}

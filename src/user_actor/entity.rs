//! [`ActorEntity`] implementation for [`User`].

use async_trait::async_trait;

use crate::error::MarketError;
use crate::framework::ActorEntity;
use crate::model::{User, UserCreate, UserUpdate};

/// Users expose no custom actions.
#[derive(Debug)]
pub enum UserAction {}

#[async_trait]
impl ActorEntity for User {
    type Id = String;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = ();
    type Context = ();
    type Error = MarketError;

    fn from_create_params(id: String, params: UserCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
            active: true,
        })
    }

    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: UserAction, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}

use sea_orm::{ColumnTrait, Condition};

use crate::entities::{albums, photos};

/// The authenticated principal a request acts on behalf of, or absent for
/// anonymous reads. Resolved once by the auth middleware and passed into
/// every service call explicitly.
#[derive(Clone, Debug)]
pub struct Actor {
    pub id: i32,
    pub username: String,
    pub full_name: String,
}

/// A resource with an owner and a public/private flag.
pub trait Restricted {
    fn owner_id(&self) -> i32;
    fn is_public(&self) -> bool;
}

impl Restricted for photos::Model {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
    fn is_public(&self) -> bool {
        self.is_public
    }
}

impl Restricted for albums::Model {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
    fn is_public(&self) -> bool {
        self.is_public
    }
}

/// A resource is visible when it is public or owned by the actor.
pub fn can_view<R: Restricted>(resource: &R, actor: Option<&Actor>) -> bool {
    resource.is_public() || actor.is_some_and(|a| a.id == resource.owner_id())
}

/// Only the owner may modify or delete. There is no admin override and no
/// sharing concept.
pub fn can_mutate<R: Restricted>(resource: &R, actor: Option<&Actor>) -> bool {
    actor.is_some_and(|a| a.id == resource.owner_id())
}

/// Builds the listing visibility filter: without an owner filter the visible
/// set is everything public plus the actor's own resources; with an explicit
/// owner filter, that owner's full set for the owner themselves and only the
/// public subset for everyone else.
pub fn visibility_condition<C>(
    actor: Option<&Actor>,
    owner_filter: Option<i32>,
    is_public_col: C,
    owner_col: C,
) -> Condition
where
    C: ColumnTrait,
{
    match owner_filter {
        Some(owner_id) => {
            let mut cond = Condition::all().add(owner_col.eq(owner_id));
            if actor.map(|a| a.id) != Some(owner_id) {
                cond = cond.add(is_public_col.eq(true));
            }
            cond
        }
        None => match actor {
            Some(actor) => Condition::any()
                .add(is_public_col.eq(true))
                .add(owner_col.eq(actor.id)),
            None => Condition::all().add(is_public_col.eq(true)),
        },
    }
}

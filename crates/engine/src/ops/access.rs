//! Ownership checks.
//!
//! The HTTP layer authenticates the caller; the engine still refuses to
//! touch any row whose `user_id` does not match. A row owned by somebody
//! else is indistinguishable from a missing row in every error the engine
//! returns.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, accounts, cards, debts, envelopes, goals, invoices, recurring,
    transactions, wishlist,
};

use super::Engine;

/// Generates a `require_*` lookup returning the model when the row exists
/// and belongs to the user.
macro_rules! impl_require_owned {
    ($fn_name:ident, $entity:path, $user_col:expr, $model:ty, $err_msg:literal) => {
        pub(super) async fn $fn_name(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .filter($user_col.eq(user_id))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_owned!(
        require_envelope,
        envelopes::Entity,
        envelopes::Column::UserId,
        envelopes::Model,
        "envelope"
    );

    impl_require_owned!(
        require_transaction,
        transactions::Entity,
        transactions::Column::UserId,
        transactions::Model,
        "transaction"
    );

    impl_require_owned!(
        require_debt,
        debts::Entity,
        debts::Column::UserId,
        debts::Model,
        "debt"
    );

    impl_require_owned!(
        require_goal,
        goals::Entity,
        goals::Column::UserId,
        goals::Model,
        "goal"
    );

    impl_require_owned!(
        require_account,
        accounts::Entity,
        accounts::Column::UserId,
        accounts::Model,
        "account"
    );

    impl_require_owned!(
        require_card,
        cards::Entity,
        cards::Column::UserId,
        cards::Model,
        "card"
    );

    impl_require_owned!(
        require_wishlist_item,
        wishlist::Entity,
        wishlist::Column::UserId,
        wishlist::Model,
        "wishlist item"
    );

    impl_require_owned!(
        require_recurring_item,
        recurring::Entity,
        recurring::Column::UserId,
        recurring::Model,
        "recurring item"
    );

    /// Invoices are owned transitively through their card.
    pub(super) async fn require_invoice_on_card(
        &self,
        db: &DatabaseTransaction,
        invoice_id: Uuid,
        card_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<invoices::Model> {
        self.require_card(db, card_id, user_id).await?;
        invoices::Entity::find_by_id(invoice_id.to_string())
            .filter(invoices::Column::CardId.eq(card_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("invoice".to_string()))
    }
}

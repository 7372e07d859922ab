//! Translates a [`ListPlan`] into a SeaORM `Select`.

use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select};

use crate::domain::{ListPlan, PageWindow, LIKE_ESCAPE};

/// Adds the search predicate, if any, as
/// `col1 LIKE '%term%' ESCAPE '\' OR col2 LIKE ...`.
///
/// Used for both the count query and the bounded query.
pub(super) fn filtered<E, C>(
    select: Select<E>,
    plan: &ListPlan<C>,
    column: impl Fn(C) -> E::Column,
) -> Select<E>
where
    E: EntityTrait,
    C: Copy,
{
    let Some(search) = &plan.filter else {
        return select;
    };

    let condition = search
        .columns()
        .iter()
        .fold(Condition::any(), |condition, &c| {
            condition.add(column(c).like(LikeExpr::new(search.pattern()).escape(LIKE_ESCAPE)))
        });

    select.filter(condition)
}

/// Adds the resolved order clause and, when present, the page window.
pub(super) fn ordered_window<E, C>(
    select: Select<E>,
    plan: &ListPlan<C>,
    window: Option<PageWindow>,
    column: impl Fn(C) -> E::Column,
) -> Select<E>
where
    E: EntityTrait,
    C: Copy,
{
    let order = if plan.order.is_desc() {
        Order::Desc
    } else {
        Order::Asc
    };
    let select = select.order_by(column(plan.order.column), order);

    match window {
        Some(window) => select.offset(window.offset).limit(window.limit),
        None => select,
    }
}

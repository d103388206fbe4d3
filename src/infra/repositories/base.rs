//! Shared query helpers for the repositories.

use sea_orm::{ConnectionTrait, EntityTrait, Order, PaginatorTrait, Select};

use crate::errors::{AppError, AppResult};
use crate::types::{Page, PageRequest, SortDirection};

/// Fetch one page of `select` along with the total row count
pub(crate) async fn fetch_page<E, C>(
    db: &C,
    select: Select<E>,
    request: &PageRequest,
) -> AppResult<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    C: ConnectionTrait,
{
    let paginator = select.paginate(db, request.size);
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(request.page).await?;
    Ok(Page::new(models, request, total))
}

/// Count rows matched by `select`
pub(crate) async fn count<E, C>(db: &C, select: Select<E>) -> AppResult<u64>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    C: ConnectionTrait,
{
    Ok(select.count(db).await?)
}

pub(crate) fn sort_order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

pub(crate) fn invalid_sort(field: &str) -> AppError {
    AppError::bad_request(format!("Invalid sort field: {}", field))
}

//! Free-text search and paging helpers shared by the list queries.

use sea_orm::sea_query::{ColumnRef, Expr, Func, IntoColumnRef};
use sea_orm::{
    ConnectionTrait, Condition, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QuerySelect,
    Select,
};
use zakat_shared::types::PageRequest;

/// Case-insensitive substring match of `term` against any of `columns`.
///
/// Returns `None` for an absent or blank term so callers can skip the filter.
pub(crate) fn contains_any(term: Option<&str>, columns: Vec<ColumnRef>) -> Option<Condition> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));

    let condition = columns.into_iter().fold(Condition::any(), |any, column| {
        any.add(Expr::expr(Func::lower(Expr::col(column))).like(pattern.clone()))
    });
    Some(condition)
}

/// Qualified column reference, so joined queries stay unambiguous.
pub(crate) fn col<E, C>(entity: E, column: C) -> ColumnRef
where
    E: sea_orm::Iden + 'static,
    C: sea_orm::Iden + 'static,
{
    (entity, column).into_column_ref()
}

/// Escapes the LIKE wildcards; Postgres treats backslash as the escape character.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Counts the filtered rows, then fetches one page of them.
pub(crate) async fn fetch_page<E, C>(
    query: Select<E>,
    page: PageRequest,
    conn: &C,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    let total = query.clone().count(conn).await?;
    let rows = query
        .offset(page.offset())
        .limit(page.limit())
        .all(conn)
        .await?;
    Ok((rows, total))
}

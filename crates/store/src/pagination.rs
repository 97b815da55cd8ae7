//! Two-phase list pagination.
//!
//! A sort key the store knows is handled by [`NativeSort`]: one page,
//! ordered by the store. A key computed at read time (see
//! [`VirtualFieldRegistry`]) is handled by [`VirtualSort`]:
//!
//! 1. fetch the filtered superset, ordered by `Id`, capped at
//!    [`SUPERSET_CEILING`];
//! 2. decorate every record and compute its virtual fields;
//! 3. sort the whole set with the tie-break chain;
//! 4. slice the requested page and synthesize `pageInfo`.
//!
//! Filters are always pushed down to the store, so totals on both paths
//! count the filtered set.

use async_trait::async_trait;
use voyage_core::paging::{paginate, Page};
use voyage_core::query::ListQuery;
use voyage_core::sorting::TieBreakChain;
use voyage_core::types::{Record, ID_FIELD};
use voyage_core::virtual_field::{rating_chain, ReviewSummary, VirtualFieldRegistry};

use crate::client::{ListOptions, RecordClient};
use crate::error::StoreError;

/// Maximum number of records read for an in-memory sort.
pub const SUPERSET_CEILING: usize = 1000;

/// Display step applied to every listed record.
pub type Decorator = dyn Fn(Record) -> Record + Send + Sync;

/// What to list: a table, a validated query, and its pushed-down filter.
pub struct ListPlan<'a> {
    pub table: &'a str,
    pub query: &'a ListQuery,
    pub filter: Option<String>,
}

#[async_trait]
pub trait SortStrategy: Send + Sync {
    async fn fetch(
        &self,
        client: &RecordClient,
        plan: &ListPlan<'_>,
        decorate: &Decorator,
    ) -> Result<Page<Record>, StoreError>;
}

/// The store sorts and pages; its `pageInfo` passes through unchanged.
pub struct NativeSort;

#[async_trait]
impl SortStrategy for NativeSort {
    async fn fetch(
        &self,
        client: &RecordClient,
        plan: &ListPlan<'_>,
        decorate: &Decorator,
    ) -> Result<Page<Record>, StoreError> {
        let options = ListOptions::page(plan.query.page, plan.query.limit)
            .filter(plan.filter.clone())
            .sort(plan.query.sort_expression());
        let page = client.list(plan.table, &options).await?;
        Ok(page.map(decorate))
    }
}

/// Sort by a computed key in memory.
pub struct VirtualSort {
    compute: fn(&mut Record),
    chain: TieBreakChain<Record>,
}

impl VirtualSort {
    pub fn new(compute: fn(&mut Record), chain: TieBreakChain<Record>) -> Self {
        Self { compute, chain }
    }

    /// Average review rating, then review count, then `Id`.
    pub fn ratings() -> Self {
        Self::new(|record| ReviewSummary::of(record).apply(record), rating_chain())
    }
}

#[async_trait]
impl SortStrategy for VirtualSort {
    async fn fetch(
        &self,
        client: &RecordClient,
        plan: &ListPlan<'_>,
        decorate: &Decorator,
    ) -> Result<Page<Record>, StoreError> {
        let superset = client
            .list_all(
                plan.table,
                plan.filter.as_deref(),
                Some(ID_FIELD),
                None,
                SUPERSET_CEILING,
            )
            .await?;

        let mut records: Vec<Record> = superset
            .list
            .into_iter()
            .map(|record| {
                let mut record = decorate(record);
                (self.compute)(&mut record);
                record
            })
            .collect();

        self.chain.sort(&mut records, plan.query.order);
        Ok(paginate(records, plan.query.page, plan.query.limit))
    }
}

/// Pick the strategy for a query's sort key.
pub fn select_strategy(query: &ListQuery, registry: &VirtualFieldRegistry) -> Box<dyn SortStrategy> {
    if registry.contains(&query.sort) {
        Box::new(VirtualSort::ratings())
    } else {
        Box::new(NativeSort)
    }
}

/// List a table, choosing the sort strategy from the query.
pub async fn list_sorted(
    client: &RecordClient,
    plan: &ListPlan<'_>,
    registry: &VirtualFieldRegistry,
    decorate: &Decorator,
) -> Result<Page<Record>, StoreError> {
    select_strategy(plan.query, registry)
        .fetch(client, plan, decorate)
        .await
}

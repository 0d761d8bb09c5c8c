//! Query shaping: client order-by expressions resolved through field mapping
//! tables into storage orderings, plus offset pagination.

pub mod mapping;
pub mod mappings;
pub mod memory;
pub mod order;
pub mod page;
pub mod sort;

pub use mapping::{
    MappingEntry, MappingError, MappingRegistry, MappingTable, Shape,
    ShapePair, StorageShape,
};
pub use mappings::{ID_COLUMN, default_registry};
pub use memory::{MemoryOrdering, MemorySource, SortValue, SortableRecord};
pub use order::{OrderKey, OrderSpec, OrderTarget, resolve_order};
pub use page::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageMetadata, PageRequest,
    PagedSource, Paginator, fetch_page,
};
pub use sort::{SortClause, SortError, SortOrder, parse_order_by};

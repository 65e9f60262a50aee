use iter_num_tools::lin_space;
use more_asserts::{assert_ge, assert_gt};

/// Precomputed samples of an expensive function on a closed domain. Queries are
/// snapped to the nearest-below entry and clamped to the ends of the table.
#[derive(Debug, Clone)]
pub struct LookupTable<T> {
    table_entries: Vec<T>,
    query_offset: f32,
    query_to_index_scale: f32,
}

impl<T> LookupTable<T> {
    pub fn new<F>(query_domain: [f32; 2], entry_count: usize, query_to_data: F) -> LookupTable<T>
    where
        F: Fn(f32) -> T,
    {
        let mut table = LookupTable {
            table_entries: Vec::with_capacity(entry_count),
            query_offset: 0.0,
            query_to_index_scale: 0.0,
        };
        table.reset(query_domain, entry_count, query_to_data);
        table
    }

    /// Recomputes every entry of the table, possibly over a new domain.
    pub fn reset<F>(&mut self, query_domain: [f32; 2], entry_count: usize, query_to_data: F)
    where
        F: Fn(f32) -> T,
    {
        assert_gt!(entry_count, 1, "a lookup table needs at least two entries");
        assert_ge!(query_domain[1], query_domain[0]);

        self.table_entries.clear();
        self.table_entries
            .extend(lin_space(query_domain[0]..=query_domain[1], entry_count).map(query_to_data));

        let span = query_domain[1] - query_domain[0];
        self.query_offset = query_domain[0];
        self.query_to_index_scale = if span > 0.0 {
            ((entry_count - 1) as f32) / span
        } else {
            0.0
        };
    }

    #[cfg(test)]
    pub fn entry_count(&self) -> usize {
        self.table_entries.len()
    }
}

impl<T: Copy> LookupTable<T> {
    pub fn lookup(&self, query: f32) -> T {
        let raw_index = (query - self.query_offset) * self.query_to_index_scale;
        if raw_index.is_nan() || raw_index <= 0.0 {
            return self.table_entries[0];
        }
        let index = (raw_index as usize).min(self.table_entries.len() - 1);
        self.table_entries[index]
    }
}

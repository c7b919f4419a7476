//! Half-open RID runs and the lazy owner-relation maps built from them.
//!
//! One-to-many ownership in metadata is encoded implicitly: a list-owning
//! table stores only the first RID of each owner's run in a target table,
//! and the run ends where the next owner's run begins. [`MetadataRange`]
//! is the decoded form of one run; [`MemberRangeMap`] materializes the
//! full owner→range and member→owner relations of a table pair on first
//! use.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::{
    metadata::{tables::TableId, token::Token},
    Result,
};

/// A half-open run `[start, end)` of RIDs within a target table.
///
/// Ranges are always 1-based. A run whose computed bounds are inconsistent
/// (end before start, or a start past the end of the table) collapses to
/// the empty range rather than failing; the stream-level header validation
/// has already rejected structurally broken images at this point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetadataRange {
    table: TableId,
    start: u32,
    end: u32,
}

impl MetadataRange {
    /// Create a range over `table` spanning `[start, end)`.
    ///
    /// ## Arguments
    /// * `table` - The target table the RIDs index
    /// * `start` - First RID of the run (1-based)
    /// * `end`   - One past the last RID of the run
    /// * `rows`  - Row count of the target table, for clamping
    #[must_use]
    pub fn new(table: TableId, start: u32, end: u32, rows: u32) -> Self {
        if start == 0 || end < start || start > rows + 1 || end > rows + 1 {
            return Self::empty(table);
        }

        MetadataRange { table, start, end }
    }

    /// The empty range over `table`
    #[must_use]
    pub fn empty(table: TableId) -> Self {
        MetadataRange {
            table,
            start: 1,
            end: 1,
        }
    }

    /// The target table this range indexes
    #[must_use]
    pub fn table(&self) -> TableId {
        self.table
    }

    /// First RID of the run (meaningless when empty)
    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    /// One past the last RID of the run
    #[must_use]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of RIDs in the run
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// True when the run holds no RIDs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// True when `rid` lies within the run
    #[must_use]
    pub fn contains(&self, rid: u32) -> bool {
        rid >= self.start && rid < self.end
    }

    /// Iterator over the RIDs of the run
    pub fn rids(&self) -> impl Iterator<Item = u32> {
        self.start..self.end
    }

    /// Iterator over the tokens of the run
    pub fn tokens(&self) -> impl Iterator<Item = Token> {
        let table = self.table;
        (self.start..self.end).map(move |rid| Token::from_table(table, rid))
    }
}

impl IntoIterator for MetadataRange {
    type Item = Token;
    type IntoIter = RangeTokens;

    fn into_iter(self) -> Self::IntoIter {
        RangeTokens {
            table: self.table,
            current: self.start,
            end: self.end,
        }
    }
}

/// Token iterator over a [`MetadataRange`].
pub struct RangeTokens {
    table: TableId,
    current: u32,
    end: u32,
}

impl Iterator for RangeTokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.current >= self.end {
            return None;
        }

        let token = Token::from_table(self.table, self.current);
        self.current += 1;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.current) as usize;
        (remaining, Some(remaining))
    }
}

struct RangeMapState {
    forward: FxHashMap<u32, MetadataRange>,
    inverse: FxHashMap<u32, u32>,
}

/// Lazily materialized owner relation between an owning table and a target
/// table.
///
/// The maps are computed once, on first query, by walking the owning table
/// in RID order; publication goes through a [`OnceLock`], so concurrent
/// first queries may both compute but only one result is installed and
/// every reader observes the fully populated maps.
pub struct MemberRangeMap {
    target: TableId,
    state: OnceLock<RangeMapState>,
}

impl MemberRangeMap {
    /// Create an unpopulated relation targeting `table`
    #[must_use]
    pub fn new(table: TableId) -> Self {
        MemberRangeMap {
            target: table,
            state: OnceLock::new(),
        }
    }

    /// The target table of this relation
    #[must_use]
    pub fn target(&self) -> TableId {
        self.target
    }

    fn state<F>(&self, populate: F) -> Result<&RangeMapState>
    where
        F: FnOnce() -> Result<RangeMapState>,
    {
        if let Some(state) = self.state.get() {
            return Ok(state);
        }

        let built = populate()?;
        Ok(self.state.get_or_init(|| built))
    }

    /// Look up the member range of `owner_rid`, populating the maps on
    /// first use.
    ///
    /// ## Arguments
    /// * `owner_rid`  - RID in the owning table
    /// * `owner_rows` - Row count of the association table to walk
    /// * `owner_of`   - Maps an association RID to the owner it describes
    /// * `member_range` - Reads the decoded run of an association RID
    ///
    /// # Errors
    /// Propagates row access errors from the populating walk; an unknown
    /// owner answers the empty range
    pub fn range_of<O, R>(
        &self,
        owner_rid: u32,
        owner_rows: u32,
        owner_of: O,
        member_range: R,
    ) -> Result<MetadataRange>
    where
        O: Fn(u32) -> Result<u32>,
        R: Fn(u32) -> Result<MetadataRange>,
    {
        let state = self.state(|| self.populate(owner_rows, owner_of, member_range))?;
        Ok(state
            .forward
            .get(&owner_rid)
            .copied()
            .unwrap_or_else(|| MetadataRange::empty(self.target)))
    }

    /// Look up the owner of `member_rid`, populating the maps on first
    /// use. Answers 0 for a member no owner claims.
    ///
    /// ## Arguments
    /// * `member_rid` - RID in the target table
    /// * `owner_rows` - Row count of the association table to walk
    /// * `owner_of`   - Maps an association RID to the owner it describes
    /// * `member_range` - Reads the decoded run of an association RID
    ///
    /// # Errors
    /// Propagates row access errors from the populating walk
    pub fn owner_of<O, R>(
        &self,
        member_rid: u32,
        owner_rows: u32,
        owner_of: O,
        member_range: R,
    ) -> Result<u32>
    where
        O: Fn(u32) -> Result<u32>,
        R: Fn(u32) -> Result<MetadataRange>,
    {
        let state = self.state(|| self.populate(owner_rows, owner_of, member_range))?;
        Ok(state.inverse.get(&member_rid).copied().unwrap_or(0))
    }

    fn populate<O, R>(&self, owner_rows: u32, owner_of: O, member_range: R) -> Result<RangeMapState>
    where
        O: Fn(u32) -> Result<u32>,
        R: Fn(u32) -> Result<MetadataRange>,
    {
        let mut forward =
            FxHashMap::with_capacity_and_hasher(owner_rows as usize, Default::default());
        let mut inverse = FxHashMap::default();

        for assoc_rid in 1..=owner_rows {
            let owner = owner_of(assoc_rid)?;
            let range = member_range(assoc_rid)?;

            for member_rid in range.rids() {
                inverse.insert(member_rid, owner);
            }
            forward.insert(owner, range);
        }

        Ok(RangeMapState { forward, inverse })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_basics() {
        let range = MetadataRange::new(TableId::Field, 2, 5, 10);
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));

        let tokens: Vec<Token> = range.tokens().collect();
        assert_eq!(
            tokens,
            vec![
                Token::new(0x0400_0002),
                Token::new(0x0400_0003),
                Token::new(0x0400_0004)
            ]
        );
    }

    #[test]
    fn range_clamping() {
        // end before start collapses to empty
        assert!(MetadataRange::new(TableId::Field, 5, 3, 10).is_empty());
        // start past the table collapses to empty
        assert!(MetadataRange::new(TableId::Field, 12, 12, 10).is_empty());
        // end past the table collapses to empty
        assert!(MetadataRange::new(TableId::Field, 1, 12, 10).is_empty());
        // zero start is not a valid RID
        assert!(MetadataRange::new(TableId::Field, 0, 3, 10).is_empty());
        // the full table plus the one-past-end bound is valid
        let all = MetadataRange::new(TableId::Field, 1, 11, 10);
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn map_population() {
        // 3 owners with runs [1,1), [1,5), [5,7) over a 6-row target
        let starts = [1u32, 1, 5];
        let map = MemberRangeMap::new(TableId::Field);

        let owner_of = |rid: u32| Ok(rid);
        let member_range = |rid: u32| {
            let start = starts[(rid - 1) as usize];
            let end = if rid == 3 { 7 } else { starts[rid as usize] };
            Ok(MetadataRange::new(TableId::Field, start, end, 6))
        };

        let range_1 = map.range_of(1, 3, owner_of, member_range).unwrap();
        assert!(range_1.is_empty());

        let range_2 = map.range_of(2, 3, owner_of, member_range).unwrap();
        assert_eq!((range_2.start(), range_2.end()), (1, 5));

        let range_3 = map.range_of(3, 3, owner_of, member_range).unwrap();
        assert_eq!((range_3.start(), range_3.end()), (5, 7));

        // inverse agreement
        for member in 1..=4 {
            assert_eq!(map.owner_of(member, 3, owner_of, member_range).unwrap(), 2);
        }
        for member in 5..=6 {
            assert_eq!(map.owner_of(member, 3, owner_of, member_range).unwrap(), 3);
        }

        // unknown keys
        assert!(map.range_of(9, 3, owner_of, member_range).unwrap().is_empty());
        assert_eq!(map.owner_of(9, 3, owner_of, member_range).unwrap(), 0);
    }
}

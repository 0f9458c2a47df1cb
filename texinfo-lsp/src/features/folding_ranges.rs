use lsp_types::{FoldingRange, FoldingRangeKind};
use texinfo::{FoldRange, RangeKind};

/// Folding ranges ordered by start line, as editors expect them.
pub fn folding_ranges(ranges: &[FoldRange]) -> Vec<FoldingRange> {
    let mut folding: Vec<FoldingRange> = ranges.iter().map(to_folding_range).collect();
    folding.sort_by_key(|range| (range.start_line, range.end_line));
    folding
}

fn to_folding_range(range: &FoldRange) -> FoldingRange {
    let kind = match range.kind {
        RangeKind::Comment => Some(FoldingRangeKind::Comment),
        RangeKind::HeaderRegion => Some(FoldingRangeKind::Region),
        RangeKind::Block | RangeKind::Section => None,
    };
    FoldingRange {
        start_line: range.start as u32,
        start_character: None,
        end_line: range.end as u32,
        end_character: None,
        kind,
        collapsed_text: None,
    }
}

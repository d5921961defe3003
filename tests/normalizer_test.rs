//! Property tests for primitive normalization.

use proptest::prelude::*;

use pdfstruct::structure::{normalize_page, NormalizeOptions};
use pdfstruct::{BoundingBox, FigureRegion, PagePrimitives, TableRegion, TextRun};

fn bbox_strategy() -> impl Strategy<Value = BoundingBox> {
    (0u16..500, 0u16..700, 1u16..120, 1u16..40).prop_map(|(x, y, w, h)| {
        let (x, y) = (f32::from(x), f32::from(y));
        BoundingBox::new(x, y, x + f32::from(w), y + f32::from(h))
    })
}

fn run_strategy() -> impl Strategy<Value = TextRun> {
    ("[a-z ]{0,10}", 6u8..30, any::<bool>(), bbox_strategy()).prop_map(|(text, size, bold, bbox)| {
        let mut run = TextRun::new(text, f32::from(size), bbox);
        run.bold = bold;
        run
    })
}

fn table_strategy() -> impl Strategy<Value = TableRegion> {
    (bbox_strategy(), 1usize..4, 1usize..4, "[a-z]{0,4}").prop_map(|(bbox, rows, cols, cell)| {
        TableRegion::new(bbox, vec![vec![cell; cols]; rows])
    })
}

fn page_strategy() -> impl Strategy<Value = PagePrimitives> {
    (
        prop::collection::vec(run_strategy(), 0..25),
        prop::collection::vec(table_strategy(), 0..3),
        prop::collection::vec(bbox_strategy().prop_map(FigureRegion::new), 0..3),
    )
        .prop_map(|(text_runs, tables, figures)| PagePrimitives {
            page_number: 1,
            text_runs,
            tables,
            figures,
        })
}

/// A page together with a shuffled copy of it.
fn shuffled_pair() -> impl Strategy<Value = (PagePrimitives, PagePrimitives)> {
    page_strategy().prop_flat_map(|page| {
        let runs = Just(page.text_runs.clone()).prop_shuffle();
        let tables = Just(page.tables.clone()).prop_shuffle();
        let figures = Just(page.figures.clone()).prop_shuffle();
        (Just(page), runs, tables, figures).prop_map(|(page, text_runs, tables, figures)| {
            let shuffled = PagePrimitives {
                page_number: page.page_number,
                text_runs,
                tables,
                figures,
            };
            (page, shuffled)
        })
    })
}

proptest! {
    #[test]
    fn test_input_order_does_not_matter((page, shuffled) in shuffled_pair()) {
        let options = NormalizeOptions::default();
        let a = normalize_page(&page, &options).unwrap();
        let b = normalize_page(&shuffled, &options).unwrap();
        prop_assert_eq!(a.items, b.items);
        prop_assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_items_are_conserved(page in page_strategy()) {
        let normalized = normalize_page(&page, &NormalizeOptions::default()).unwrap();
        prop_assert_eq!(
            normalized.items.len() + normalized.report.discarded(),
            page.item_count()
        );
        prop_assert_eq!(normalized.report.duplicate_figures + normalized.items.iter().filter(|i| i.is_figure()).count(), page.figures.len());
        prop_assert_eq!(normalized.items.iter().filter(|i| i.is_table()).count(), page.tables.len());
    }

    #[test]
    fn test_order_keys_are_sequential(page in page_strategy()) {
        let normalized = normalize_page(&page, &NormalizeOptions::default()).unwrap();
        for (i, item) in normalized.items.iter().enumerate() {
            prop_assert_eq!(item.order as usize, i);
            prop_assert_eq!(item.page_number, 1);
        }
    }

    #[test]
    fn test_no_surviving_run_inside_owner(page in page_strategy()) {
        let normalized = normalize_page(&page, &NormalizeOptions::default()).unwrap();
        let owners: Vec<BoundingBox> = page
            .tables
            .iter()
            .map(|t| t.bbox)
            .chain(page.figures.iter().map(|f| f.bbox))
            .collect();
        for item in normalized.items.iter().filter(|i| i.is_text()) {
            let (cx, cy) = item.bbox.center();
            prop_assert!(!owners.iter().any(|o| o.contains_point(cx, cy)));
            prop_assert!(!item.plain_text().trim().is_empty());
        }
    }
}

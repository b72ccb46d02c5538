use print_layout_core::error::PackError;
use print_layout_core::prelude::*;

fn cfg(w: u32, h: u32, strategy: Strategy) -> PackerConfig {
    PackerConfig::builder()
        .with_page_size(w, h)
        .strategy(strategy)
        .build()
}

#[test]
fn page_overflow_moves_image_to_next_page() {
    for strategy in [Strategy::Sequential, Strategy::Random] {
        let layout = pack_layout(vec![("a", 60, 50), ("b", 60, 50)], cfg(100, 50, strategy))
            .expect("pack");
        let a = &layout.tiles[0];
        let b = &layout.tiles[1];
        assert_eq!((a.page, a.x, a.y), (0, 0, 0), "{strategy}");
        assert_eq!((b.page, b.x, b.y), (1, 0, 0), "{strategy}");
        assert_eq!(layout.page_count(), 2);
        assert_eq!(
            layout.pages,
            vec![
                PageInfo { id: 0, used_height: 50, tiles: 1 },
                PageInfo { id: 1, used_height: 50, tiles: 1 },
            ]
        );
    }
}

#[test]
fn side_by_side_when_width_allows() {
    let layout = pack_layout(
        vec![("a", 40, 50), ("b", 40, 50)],
        cfg(100, 50, Strategy::Sequential),
    )
    .expect("pack");
    assert_eq!(layout.page_count(), 1);
    assert_eq!((layout.tiles[1].x, layout.tiles[1].y), (40, 0));
}

#[test]
fn later_images_follow_onto_new_page() {
    // Third image overflows page 0; the fourth continues on page 1 even though a gap on
    // page 0 could have held it.
    let layout = pack_layout(
        vec![("a", 10, 6), ("b", 4, 2), ("c", 10, 6), ("d", 4, 2)],
        cfg(10, 10, Strategy::Sequential),
    )
    .expect("pack");
    let pages: Vec<usize> = layout.tiles.iter().map(|t| t.page).collect();
    assert_eq!(pages, vec![0, 0, 1, 1]);
    assert_eq!((layout.tiles[3].x, layout.tiles[3].y), (0, 6));
    assert_eq!(layout.pages[0].used_height, 8);
    assert_eq!(layout.page_tiles(1).count(), 2);
}

#[test]
fn oversize_images_rejected_before_placement() {
    let err = pack_layout(
        vec![("ok", 10, 10), ("wide", 101, 10)],
        cfg(100, 100, Strategy::Sequential),
    )
    .unwrap_err();
    match err {
        PackError::ImageTooWide { key, width, page_width } => {
            assert_eq!(key, "wide");
            assert_eq!((width, page_width), (101, 100));
        }
        other => panic!("expected ImageTooWide, got {other:?}"),
    }

    let err = pack_layout(
        vec![("ok", 10, 10), ("tall", 10, 101)],
        cfg(100, 100, Strategy::Random),
    )
    .unwrap_err();
    assert!(matches!(err, PackError::ImageTooTall { ref key, .. } if key == "tall"));
    assert!(!err.is_internal());
}

#[test]
fn invalid_inputs() {
    assert!(matches!(
        pack_layout(vec![("a", 5, 5), ("z", 0, 10)], PackerConfig::default()),
        Err(PackError::ZeroWidth { key }) if key == "z"
    ));
    assert!(matches!(
        pack_layout(vec![("a", 1, 1)], cfg(0, 10, Strategy::Sequential)),
        Err(PackError::InvalidDimensions { width: 0, height: 10 })
    ));
}

#[test]
fn empty_input_gives_empty_layout() {
    for strategy in [Strategy::Sequential, Strategy::Random] {
        let layout = pack_layout(Vec::<(String, u32, u32)>::new(), cfg(100, 100, strategy))
            .expect("empty input is valid");
        assert!(layout.tiles.is_empty());
        assert_eq!(layout.page_count(), 0);
        assert_eq!(layout.stats().num_pages, 0);
        assert_eq!(layout.stats().occupancy, 0.0);
        assert_eq!(layout.meta.strategy, strategy);
    }
}

#[test]
fn zero_height_images_are_placed() {
    let items = vec![("a", 4, 3), ("rule", 6, 0), ("b", 10, 2)];
    let layout = pack_layout(items, cfg(10, 10, Strategy::Sequential)).expect("pack");
    let pos: Vec<(u32, u32)> = layout.tiles.iter().map(|t| (t.x, t.y)).collect();
    assert_eq!(pos, vec![(0, 0), (4, 0), (0, 3)]);
    assert_eq!(layout.tiles[1].height, 0);
    assert_eq!(layout.page_count(), 1);
    assert_eq!(layout.pages[0].tiles, 3);
    assert_eq!(layout.pages[0].used_height, 5);

    let layout = pack_layout(vec![("a", 4, 3), ("rule", 4, 0)], cfg(10, 10, Strategy::Random))
        .expect("pack");
    assert_eq!((layout.tiles[1].x, layout.tiles[1].y), (4, 0));
}

#[test]
fn exact_fit_stays_on_page() {
    let layout = pack_layout(
        vec![("a", 10, 4), ("b", 10, 6)],
        cfg(10, 10, Strategy::Sequential),
    )
    .expect("pack");
    assert_eq!(layout.page_count(), 1);
    assert_eq!(layout.tiles[1].y, 4);
    assert_eq!(layout.pages[0].used_height, 10);
}

#[test]
fn random_strategy_keeps_input_order_in_output() {
    let items = vec![("a", 6, 2), ("b", 4, 1), ("c", 4, 3), ("d", 6, 1)];
    let layout = pack_layout(items, cfg(10, 100, Strategy::Random)).expect("pack");
    let keys: Vec<&str> = layout.tiles.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c", "d"]);
}

#[test]
fn random_is_tighter_than_sequential() {
    let items = vec![("a", 6, 2), ("b", 4, 1), ("c", 4, 3), ("d", 6, 1)];
    let seq = pack_layout(items.clone(), cfg(10, 100, Strategy::Sequential)).expect("seq");
    let rnd = pack_layout(items, cfg(10, 100, Strategy::Random)).expect("rnd");

    let pos = |l: &Layout| l.tiles.iter().map(|t| (t.x, t.y)).collect::<Vec<_>>();
    assert_eq!(pos(&seq), vec![(0, 0), (6, 0), (0, 2), (4, 2)]);
    assert_eq!(pos(&rnd), vec![(0, 0), (6, 0), (6, 1), (0, 2)]);
    assert_eq!(seq.pages[0].used_height, 5);
    assert_eq!(rnd.pages[0].used_height, 4);
    assert!(rnd.stats().max_used_height <= seq.stats().max_used_height);
}

#[test]
fn stats_summary() {
    let layout = pack_layout(
        vec![("a", 50, 50), ("b", 50, 50), ("c", 100, 100)],
        cfg(100, 100, Strategy::Sequential),
    )
    .expect("pack");
    let stats = layout.stats();
    assert_eq!(stats.num_pages, 2);
    assert_eq!(stats.num_tiles, 3);
    assert_eq!(stats.total_page_area, 20_000);
    assert_eq!(stats.used_tile_area, 15_000);
    assert!((stats.occupancy - 0.75).abs() < 1e-9);
    assert_eq!(stats.wasted_area(), 5_000);
    assert!(stats.summary().contains("Pages: 2"));
}

use print_layout_core::prelude::*;

#[test]
fn export_json_smoke() {
    let cfg = PackerConfig::builder()
        .with_page_size(100, 50)
        .strategy(Strategy::Random)
        .build();
    let items = vec![("a", 60, 50), ("b", 60, 20), ("c", 30, 10)];
    let layout = print_layout_core::pack_layout(items, cfg).expect("pack");

    let v = print_layout_core::to_json(&layout);
    let obj = v.as_object().expect("object");
    assert!(obj.contains_key("pages"));
    assert!(obj.contains_key("meta"));

    let pages = v["pages"].as_array().expect("pages array");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["id"], 0);
    assert_eq!(pages[0]["usedHeight"], 50);
    assert_eq!(pages[0]["tiles"].as_array().map(Vec::len), Some(1));
    assert_eq!(pages[1]["usedHeight"], 20);
    // "c" fits beside "b"; earlier pages are never revisited.
    let second = pages[1]["tiles"].as_array().expect("tiles");
    let keys: Vec<&str> = second.iter().filter_map(|t| t["key"].as_str()).collect();
    assert_eq!(keys, vec!["b", "c"]);
    assert_eq!(second[1]["x"], 60);
    assert_eq!(second[1]["y"], 0);
    assert_eq!(second[1]["w"], 30);

    assert_eq!(v["meta"]["strategy"], "random");
    assert_eq!(v["meta"]["pageSize"]["w"], 100);
}

#[test]
fn layout_serializes_with_serde() {
    let cfg = PackerConfig::builder().with_page_size(10, 10).build();
    let layout = print_layout_core::pack_layout(vec![("a", 5, 5)], cfg).expect("pack");
    let s = serde_json::to_string(&layout).expect("serialize");
    assert!(s.contains("\"page\":0"));
    let back: Layout = serde_json::from_str(&s).expect("deserialize");
    assert_eq!(back.tiles, layout.tiles);
    assert_eq!(back.meta, layout.meta);
}

use crate::model::Layout;
use serde_json::{Value, json};

/// Serialize a layout as `{ pages: [{ id, usedHeight, tiles: [...] }], meta }`.
///
/// Tiles are grouped per page in input order, which is the shape an external compositor
/// walks: one canvas per page, each tile drawn at its `x`/`y`.
pub fn to_json<K: ToString>(layout: &Layout<K>) -> Value {
    let pages_val = layout
        .pages
        .iter()
        .map(|p| {
            let tiles_val: Vec<Value> = layout
                .page_tiles(p.id)
                .map(|t| {
                    json!({
                        "key": t.key.to_string(),
                        "x": t.x,
                        "y": t.y,
                        "w": t.width,
                        "h": t.height,
                    })
                })
                .collect();
            json!({
                "id": p.id,
                "usedHeight": p.used_height,
                "tiles": tiles_val,
            })
        })
        .collect::<Vec<_>>();
    let meta = &layout.meta;
    json!({
        "pages": pages_val,
        "meta": {
            "app": meta.app,
            "version": meta.version,
            "pageSize": {"w": meta.page_width, "h": meta.page_height},
            "strategy": meta.strategy,
        },
    })
}

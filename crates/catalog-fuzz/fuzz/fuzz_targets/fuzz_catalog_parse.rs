#![no_main]

use arxiv_research_mcp::registry::TopicCatalog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any catalog that decodes must encode and decode to the same papers.
    if let Ok(catalog) = TopicCatalog::from_json(data) {
        let bytes = serde_json::to_vec(&catalog).unwrap();
        let again = TopicCatalog::from_json(&bytes).unwrap();
        assert_eq!(catalog, again);
    }
});

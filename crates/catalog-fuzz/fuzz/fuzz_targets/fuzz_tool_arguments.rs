#![no_main]

use arxiv_research_mcp::models::{
    ExtractInfoInput, PaperCountInput, SearchPapersInput, SearchPromptInput,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(args) = serde_json::from_slice::<serde_json::Value>(data) {
        if let Ok(input) = SearchPapersInput::parse(&args, 5) {
            assert!((1..=2000).contains(&input.max_results));
            assert!(!input.topic.slug().contains('/'));
        }
        let _ = ExtractInfoInput::parse(&args);
        let _ = PaperCountInput::parse(&args);
        let _ = SearchPromptInput::parse(&args);
    }
});

#![no_main]

use arxiv_research_mcp::gateway::ArxivGateway;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return Ok or Err
    if let Ok(papers) = ArxivGateway::parse_feed(data, 10) {
        assert!(papers.len() <= 10);
    }
});

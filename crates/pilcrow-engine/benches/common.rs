// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use pilcrow_engine::{Block, Document, Kind};

#[allow(dead_code)]
pub fn generate_document(sections: usize) -> Document {
    let mut blocks = Vec::with_capacity(sections * 6);
    for section in 0..sections {
        blocks.push(Block::with_content(Kind::HEADING, format!("Section {section}")));
        blocks.push(Block::paragraph(
            "Some paragraph content with multiple sentences. This helps create realistic document structure for benchmarking.",
        ));
        for i in 0..3 {
            blocks.push(
                Block::with_content(Kind::LIST_ITEM, format!("Item {i}"))
                    .with_property("type", "bullet"),
            );
        }
        blocks.push(Block::new(Kind::DIVIDER));
    }
    Document::new(blocks).unwrap()
}

#[allow(dead_code)]
pub fn generate_large_document() -> Document {
    generate_document(500)
}

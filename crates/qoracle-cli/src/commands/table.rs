use qoracle_core::{Hexagram, KING_WEN, Trigram};

pub fn run() {
    println!("Trigrams (lines bottom→top):\n");
    for trigram in Trigram::ALL {
        let [bottom, middle, top] = trigram.lines();
        println!(
            "  {} {} {:<5} {}  {bottom}{middle}{top}",
            trigram.symbol(),
            trigram.name(),
            trigram.pinyin(),
            trigram.image(),
        );
    }

    println!("\nKing Wen sequence:\n");
    println!("  {:>3}  {}  {:<4} {:<6} Lines", "#", "卦", "Name", "上/下");
    for entry in &KING_WEN {
        let hexagram = Hexagram::from_trigrams(entry.upper, entry.lower);
        println!(
            "  {:>3}  {}  {:<4} {}{}    {hexagram}",
            entry.number,
            hexagram.symbol().unwrap_or(' '),
            entry.name,
            entry.upper.symbol(),
            entry.lower.symbol(),
        );
    }
}

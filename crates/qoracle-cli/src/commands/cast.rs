use qoracle_core::{CastingResult, EntropyDraw, Hexagram, Trigram};

use super::{BackendOptions, fail, heading, make_provider, render_hexagram};

pub fn run(options: &BackendOptions, json: bool) {
    let provider = make_provider(options);
    let result = qoracle_core::cast(&provider).unwrap_or_else(|e| fail(e));
    let history = provider.history();

    if json {
        println!("{}", to_json(&result, &history));
        return;
    }

    println!("本卦: {}", heading(&result.base()));
    println!("{}", render_hexagram(&result.base(), Some(result.moving_line())));
    println!();
    println!("之卦: {}", heading(&result.changed()));
    println!("{}", render_hexagram(&result.changed(), None));
    println!();
    println!("动爻: {}", result.moving_line());
    println!();
    for (i, draw) in history.iter().enumerate() {
        println!("随机源[{}] {}: {}", i + 1, draw.source_tag, draw.payload_hex());
    }
}

fn trigram_json(trigram: Trigram) -> serde_json::Value {
    serde_json::json!({
        "name": trigram.name(),
        "pinyin": trigram.pinyin(),
        "image": trigram.image(),
        "symbol": trigram.symbol().to_string(),
    })
}

fn hexagram_json(hexagram: &Hexagram) -> serde_json::Value {
    serde_json::json!({
        "name": hexagram.name(),
        "display_name": hexagram.display_name(),
        "king_wen": hexagram.king_wen_number(),
        "symbol": hexagram.symbol().map(String::from),
        "bits": hexagram.bits(),
        "upper": trigram_json(hexagram.upper_trigram()),
        "lower": trigram_json(hexagram.lower_trigram()),
    })
}

fn to_json(result: &CastingResult, history: &[EntropyDraw]) -> String {
    let value = serde_json::json!({
        "base": hexagram_json(&result.base()),
        "moving_line": result.moving_line(),
        "changed": hexagram_json(&result.changed()),
        "history": history,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|e| fail(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qoracle_core::SourceTag;

    #[test]
    fn json_document_shape() {
        let base = Hexagram::new([1, 0, 1, 1, 0, 1]).unwrap();
        let result = CastingResult::new(base, 6).unwrap();
        let history = vec![
            EntropyDraw::new(SourceTag::Anu, vec![0x2D]),
            EntropyDraw::new(SourceTag::Anu, vec![0x05]),
        ];

        let value: serde_json::Value = serde_json::from_str(&to_json(&result, &history)).unwrap();
        assert_eq!(value["moving_line"], 6);
        assert_eq!(value["base"]["king_wen"], 30);
        assert_eq!(value["base"]["symbol"], "䷝");
        assert_eq!(value["changed"]["name"], "丰");
        assert_eq!(value["changed"]["upper"]["name"], "震");
        assert_eq!(value["changed"]["upper"]["pinyin"], "zhèn");
        assert_eq!(value["changed"]["upper"]["image"], "雷");
        assert_eq!(value["changed"]["lower"]["symbol"], "☲");
        assert_eq!(value["changed"]["bits"], serde_json::json!([1, 0, 1, 1, 0, 0]));
        assert_eq!(value["history"][0]["source_tag"], "ANU");
        assert_eq!(value["history"][1]["payload"], "05");
    }
}

/// A language the correction prompt can be tagged with.
///
/// The catalog is informational: the extractor never branches on locale, it
/// only rides along into the prompt and back out for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub code: &'static str,
    pub name: &'static str,
}

const SUPPORTED_LOCALES: &[Locale] = &[
    Locale { code: "en", name: "English" },
    Locale { code: "es", name: "Spanish" },
    Locale { code: "fr", name: "French" },
    Locale { code: "de", name: "German" },
    Locale { code: "it", name: "Italian" },
    Locale { code: "pt", name: "Portuguese" },
    Locale { code: "ru", name: "Russian" },
    Locale { code: "ja", name: "Japanese" },
    Locale { code: "ko", name: "Korean" },
    Locale { code: "zh", name: "Chinese" },
];

pub fn all() -> &'static [Locale] {
    SUPPORTED_LOCALES
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LOCALES.iter().any(|locale| locale.code == code)
}

/// Example sentence (with deliberate mistakes) for a locale, used as
/// placeholder text by UI clients.
pub fn sample_text(code: &str) -> Option<&'static str> {
    match code {
        "en" => Some("I are going to the store and buy some apple."),
        "es" => Some("Yo va a la tienda y comprar algunas manzana."),
        "fr" => Some("Je va au magasin et acheter quelques pomme."),
        "de" => Some("Ich gehe zu der Geschäft und kaufe einige Apfel."),
        "it" => Some("Io va al negozio e comprare alcune mela."),
        "pt" => Some("Eu vai para a loja e comprar algumas maçã."),
        "ru" => Some("Я идти в магазин и покупать некоторые яблоко."),
        "ja" => Some("私は店に行くと、いくつかのりんごを買う。"),
        "ko" => Some("나는 가게에 가서 사과를 몇 개 산다."),
        "zh" => Some("我去商店买一些苹果。"),
        _ => None,
    }
}

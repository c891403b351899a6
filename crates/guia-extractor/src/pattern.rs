//! Pattern-based field extraction
//!
//! Deterministic extraction for paragraphs of the documented shape
//! (`"<Name>: <prose>"`) using regex rules and fixed vocabularies:
//! - Sentence rules: address, price, voucher, accessibility, hours
//! - Vocabularies: neighborhoods, cuisines, diet options
//! - Leftover sentences: description, and highlights when they carry a marker
//!
//! A field without a textual cue is reported missing. Nothing is guessed.

use regex::Regex;

use crate::FieldExtractor;
use guia_core::{
    collapse_whitespace, fold_key, ExtractedFields, Extraction, GuiaError, PriceLevel, Result,
    TriState,
};
use guia_parser::split_sentences;

/// Longest text accepted as a restaurant name
const MAX_NAME_CHARS: usize = 120;

// ============================================================================
// Vocabularies
// ============================================================================

/// Fixed vocabulary matched on folded text at word boundaries
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    labels: Vec<String>,
    /// Compiled spelling -> label index
    matchers: Vec<(Regex, usize)>,
}

/// Folded phrases that negate the term right after them
const NEGATIONS: &[&str] = &["nao serve", "nao servem", "nao tem", "nao oferece", "sem"];

impl Vocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term and its aliases
    pub fn add_term(&mut self, label: &str, aliases: &[&str]) {
        let index = self.labels.len();

        for spelling in std::iter::once(label).chain(aliases.iter().copied()) {
            let pattern = format!(r"\b{}\b", regex::escape(&fold_key(spelling)));
            if let Ok(regex) = Regex::new(&pattern) {
                self.matchers.push((regex, index));
            }
        }

        self.labels.push(label.to_string());
    }

    /// Labels mentioned in the text, in order of first mention
    ///
    /// A mention directly preceded by a negation ("não serve", "sem") does
    /// not count.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        let folded = fold_key(text);

        // (start, length, label)
        let mut hits: Vec<(usize, usize, usize)> = self
            .matchers
            .iter()
            .filter_map(|(regex, index)| {
                regex
                    .find_iter(&folded)
                    .find(|m| !is_negated(&folded[..m.start()]))
                    .map(|m| (m.start(), m.len(), *index))
            })
            .collect();

        // Earliest first; at the same position the longer spelling wins
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut seen: Vec<usize> = Vec::new();
        let mut labels = Vec::new();
        for (_, _, index) in hits {
            if !seen.contains(&index) {
                seen.push(index);
                labels.push(self.labels[index].clone());
            }
        }
        labels
    }

    /// First label mentioned in the text
    pub fn find_first(&self, text: &str) -> Option<String> {
        self.find_all(text).into_iter().next()
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the vocabulary has no terms
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ============================================================================
// Phrase Rules
// ============================================================================

/// Negative and affirmative phrasings of a yes/no fact
#[derive(Debug, Clone, Default)]
struct PhraseRule {
    negative: Vec<Regex>,
    affirmative: Vec<Regex>,
    /// Phrasings that reuse the same words for something else
    ignored: Vec<Regex>,
}

impl PhraseRule {
    fn new(negative: &[&str], affirmative: &[&str]) -> Self {
        Self {
            negative: compile(negative),
            affirmative: compile(affirmative),
            ignored: Vec::new(),
        }
    }

    fn ignoring(mut self, patterns: &[&str]) -> Self {
        self.ignored = compile(patterns);
        self
    }

    /// Negative phrasings are checked first: "não aceita vale" contains
    /// "aceita vale".
    fn classify(&self, sentence: &str) -> TriState {
        if self.ignored.iter().any(|r| r.is_match(sentence)) {
            TriState::Unknown
        } else if self.negative.iter().any(|r| r.is_match(sentence)) {
            TriState::No
        } else if self.affirmative.iter().any(|r| r.is_match(sentence)) {
            TriState::Yes
        } else {
            TriState::Unknown
        }
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

// ============================================================================
// Pattern Extractor
// ============================================================================

/// Rule-based extractor using regex patterns and vocabularies
pub struct PatternExtractor {
    /// Address rules, tried in order; group 1 is the address
    address_rules: Vec<Regex>,
    /// Price token rules; group 1 is the `$` run
    price_rules: Vec<Regex>,
    /// Hours rules; group 1 is the remainder of the sentence
    hours_rules: Vec<Regex>,
    voucher: PhraseRule,
    accessibility: PhraseRule,
    neighborhoods: Vocabulary,
    cuisines: Vocabulary,
    diets: Vocabulary,
    /// Folded marker words that turn a leftover sentence into a highlight
    highlight_markers: Vec<String>,
}

impl PatternExtractor {
    /// Create a new extractor with the default Portuguese rules
    pub fn new() -> Self {
        let mut extractor = Self {
            address_rules: Vec::new(),
            price_rules: Vec::new(),
            hours_rules: Vec::new(),
            voucher: PhraseRule::default(),
            accessibility: PhraseRule::default(),
            neighborhoods: Vocabulary::new(),
            cuisines: Vocabulary::new(),
            diets: Vocabulary::new(),
            highlight_markers: Vec::new(),
        };

        extractor.init_rules();
        extractor.init_neighborhoods();
        extractor.init_cuisines();
        extractor.init_diets();
        extractor.init_highlight_markers();
        extractor
    }

    /// Initialize sentence rules
    fn init_rules(&mut self) {
        self.address_rules = compile(&[
            r"(?i)\bendere[çc]o\b\s*:?\s*(.+)",
            r"(?i)\b(?:fica|localizad[oa]|situad[oa])\s+(?:na|no|em)\s+(.+)",
            r"\b((?i:rua|avenida|alameda|pra[çc]a|travessa|r\.|av\.|al\.)\s+[\p{Lu}\d].*)",
        ]);

        // `R$` is a currency sign, not a price level
        self.price_rules = compile(&[r"(?:^|[\s:(\[])(\$+)(?:[\s.,;:)\]!?]|$)"]);

        // Bare "funciona" only counts when a day or time follows it
        self.hours_rules = compile(&[
            r"(?i)\b(?:hor[áa]rios?(?:\s+de\s+funcionamento)?|funcionamento)\b\s*:?\s*(.+)",
            r"(?i)\bfuncionam?\s+((?:de|das|aos|todos|diariamente|segunda|ter[çc]a|quarta|quinta|sexta|s[áa]bado|domingo)\b.*|\d{1,2}\s*h.*)",
        ]);

        self.voucher = PhraseRule::new(
            &[
                r"(?i)\bn[ãa]o\s+aceitam?\s+(?:vales?\b|vr\b|va\b|ticket|cart[õo]es\s+de\s+vale)",
                r"(?i)\bvales?[\s-]refei[çc][ãa]o\s+n[ãa]o\s+[ée]\s+aceito",
            ],
            &[
                r"(?i)\baceitam?\s+(?:(?:todos\s+os\s+)?vales?\b|vr\b|va\b|ticket|cart[õo]es\s+de\s+vale)",
                r"(?i)\bvales?[\s-]refei[çc][ãa]o\s+(?:[ée]\s+)?aceito",
            ],
        );

        self.accessibility = PhraseRule::new(
            &[
                r"(?i)\bn[ãa]o\s+(?:possui|tem|oferece|h[áa])\s+(?:\w+\s+)?acessibilidade",
                r"(?i)\bsem\s+acessibilidade",
                r"(?i)\bn[ãa]o\s+[ée]\s+acess[íi]vel",
            ],
            &[
                r"(?i)\b(?:[ée]|s[ãa]o|espa[çc]o|local|ambiente|restaurante|casa|entrada|banheiros?)\s+(?:totalmente\s+|todo\s+)?acess[íi]ve(?:l|is)\b",
                r"(?i)\bacess[íi]ve(?:l|is)\s+(?:para|a)\s+cadeirantes",
                r"(?i)\b(?:possui|tem|oferece|com)\s+(?:boa\s+)?acessibilidade",
                r"(?i)\bacesso\s+para\s+cadeirantes",
                r"(?i)\badaptad[oa]\s+para\s+cadeirantes",
                r"(?i)\bbanheiro\s+adaptado",
            ],
        )
        // "preço acessível" is about price
        .ignoring(&[
            r"(?i)\b(?:pre[çc]os?|valor(?:es)?|card[áa]pio|conta|tickets?\s+m[ée]dio)\s+(?:(?:[ée]|s[ãa]o|bem|muito|mais|bastante)\s+)*acess[íi]ve(?:l|is)",
        ]);
    }

    /// Initialize neighborhoods of the west zone of São Paulo
    fn init_neighborhoods(&mut self) {
        let n = &mut self.neighborhoods;
        n.add_term("Pinheiros", &["Baixo Pinheiros", "Largo da Batata"]);
        n.add_term("Alto de Pinheiros", &[]);
        n.add_term("Vila Madalena", &["Vila Madá"]);
        n.add_term("Itaim Bibi", &["Itaim"]);
        n.add_term("Jardins", &["Jardim Paulista", "Jardim América", "Jardim Europa"]);
        n.add_term("Vila Olímpia", &[]);
        n.add_term("Butantã", &[]);
        n.add_term("Perdizes", &[]);
        n.add_term("Consolação", &[]);
        n.add_term("Higienópolis", &[]);
        n.add_term("Moema", &[]);
        n.add_term("Vila Mariana", &[]);
        n.add_term("Lapa", &[]);
        n.add_term("Barra Funda", &[]);
    }

    /// Initialize cuisine vocabulary
    fn init_cuisines(&mut self) {
        let c = &mut self.cuisines;
        c.add_term("japonesa", &["japonês", "japonesas", "sushi", "omakase"]);
        c.add_term("ramen", &["lámen", "lamen"]);
        c.add_term("izakaya", &[]);
        c.add_term("italiana", &["italiano", "cantina", "osteria", "trattoria", "massas"]);
        c.add_term("pizza", &["pizzaria", "pizzas"]);
        c.add_term("brasileira", &["brasileiro", "comida caseira", "feijoada"]);
        c.add_term("contemporânea", &["contemporâneo", "autoral"]);
        c.add_term("hambúrguer", &["hambúrgueres", "hamburgueria", "burger", "burgers"]);
        c.add_term("poke", &["pokes", "havaiana"]);
        c.add_term("frutos do mar", &["peixes", "peixe", "seafood"]);
        c.add_term("bar", &["boteco", "botequim", "bares"]);
        c.add_term("mexicana", &["mexicano", "tacos"]);
        c.add_term("árabe", &["libanesa", "libanês"]);
        c.add_term("portuguesa", &["português", "bacalhau"]);
        c.add_term("peruana", &["peruano", "ceviche"]);
        c.add_term("francesa", &["francês", "bistrô", "bistrot"]);
        c.add_term("chinesa", &["chinês", "dim sum"]);
        c.add_term("coreana", &["coreano"]);
        c.add_term("tailandesa", &["tailandês"]);
        c.add_term("cafeteria", &["cafeterias", "coffee shop"]);
        c.add_term("padaria", &["confeitaria"]);
    }

    /// Initialize diet vocabulary
    fn init_diets(&mut self) {
        let d = &mut self.diets;
        d.add_term(
            "vegetariana",
            &["vegetariano", "vegetarianas", "vegetarianos", "vegetarian"],
        );
        d.add_term("vegana", &["vegano", "veganas", "veganos", "vegan"]);
        d.add_term(
            "sem glúten",
            &["gluten free", "gluten-free", "zero glúten", "celíacos"],
        );
        d.add_term("sem lactose", &["lactose free", "zero lactose", "intolerantes à lactose"]);
        d.add_term("low carb", &["low-carb"]);
        d.add_term("kosher", &[]);
        d.add_term("halal", &[]);
    }

    /// Initialize highlight marker words
    fn init_highlight_markers(&mut self) {
        self.highlight_markers = [
            "destaque",
            "possui",
            "música ao vivo",
            "pet friendly",
            "terraço",
            "happy hour",
            "drinks",
            "drinques",
            "chef",
            "menu degustação",
            "rodízio",
            "área externa",
            "varanda",
            "karaokê",
        ]
        .iter()
        .map(|m| fold_key(m))
        .collect();
    }

    /// Extract the fields of one paragraph
    pub fn extract_fields(&self, paragraph: &str) -> Result<ExtractedFields> {
        let (name, body) = split_name(paragraph)?;
        let body = collapse_whitespace(body);

        let mut fields = ExtractedFields::named(name);
        fields.neighborhood = self.neighborhoods.find_first(&body);
        fields.cuisine = self.cuisines.find_all(&body);
        fields.diet_options = self.diets.find_all(&body);

        let mut narrative = Vec::new();
        for sentence in split_sentences(&body) {
            if !self.apply_sentence_rules(&sentence, &mut fields) {
                narrative.push(sentence);
            }
        }

        fields.highlights = narrative
            .iter()
            .filter(|s| self.is_highlight(s))
            .map(|s| trim_terminal(s).to_string())
            .collect();

        if !narrative.is_empty() {
            fields.description = Some(narrative.join(" "));
        }

        Ok(fields)
    }

    /// Apply every sentence rule; returns whether the sentence was consumed
    fn apply_sentence_rules(&self, sentence: &str, fields: &mut ExtractedFields) -> bool {
        let mut consumed = false;

        if fields.address.is_none() {
            if let Some(address) = capture_first(&self.address_rules, sentence) {
                fields.address = Some(address);
                consumed = true;
            }
        }

        if let Some(token) = capture_first(&self.price_rules, sentence) {
            if fields.price_level.is_none() {
                fields.price_level = PriceLevel::from_token(&token);
            }
            consumed = true;
        }

        if !fields.accepts_voucher.is_known() {
            let voucher = self.voucher.classify(sentence);
            if voucher.is_known() {
                fields.accepts_voucher = voucher;
                consumed = true;
            }
        }

        if !fields.accessibility.is_known() {
            let accessibility = self.accessibility.classify(sentence);
            if accessibility.is_known() {
                fields.accessibility = accessibility;
                consumed = true;
            }
        }

        if fields.hours.is_none() {
            if let Some(hours) = capture_first(&self.hours_rules, sentence) {
                fields.hours = Some(hours);
                consumed = true;
            }
        }

        consumed
    }

    fn is_highlight(&self, sentence: &str) -> bool {
        let folded = fold_key(sentence);
        self.highlight_markers.iter().any(|m| folded.contains(m))
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FieldExtractor for PatternExtractor {
    async fn extract(&self, paragraph: &str) -> Result<Extraction> {
        let fields = self.extract_fields(paragraph)?;
        Ok(Extraction::from_fields(fields))
    }

    fn name(&self) -> &str {
        "pattern"
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Whether folded text ends with a negation word
fn is_negated(before: &str) -> bool {
    let before = before.trim_end();
    NEGATIONS.iter().any(|negation| {
        before.strip_suffix(negation).is_some_and(|rest| {
            rest.chars().last().map_or(true, |c| !c.is_alphanumeric())
        })
    })
}

/// Split `"<Name>: <body>"`, rejecting anything that does not look like a name
fn split_name(paragraph: &str) -> Result<(String, &str)> {
    let paragraph = paragraph.trim();
    let (head, body) = paragraph
        .split_once(':')
        .ok_or_else(|| GuiaError::ParseAmbiguous(format!("no name separator in \"{}\"", preview(paragraph))))?;

    let name = collapse_whitespace(head);
    let looks_like_prose = [". ", "! ", "? "].iter().any(|t| head.contains(t));

    if name.is_empty()
        || head.contains('\n')
        || looks_like_prose
        || name.chars().count() > MAX_NAME_CHARS
    {
        return Err(GuiaError::ParseAmbiguous(format!(
            "\"{}\" is not a restaurant name",
            preview(&name)
        )));
    }

    Ok((name, body))
}

fn capture_first(rules: &[Regex], sentence: &str) -> Option<String> {
    rules.iter().find_map(|rule| {
        let captured = rule.captures(sentence)?.get(1)?.as_str();
        let captured = trim_terminal(captured);
        (!captured.is_empty()).then(|| captured.to_string())
    })
}

fn trim_terminal(text: &str) -> &str {
    text.trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ';' | ',') || c.is_whitespace())
}

fn preview(text: &str) -> String {
    let short: String = text.chars().take(40).collect();
    if short.len() < text.len() {
        format!("{short}...")
    } else {
        short
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use guia_core::Field;

    const ARLETE: &str = "Arlete Bar e Mercearia: Bar descolado... Fica na Rua Vupabussu, 101, Pinheiros. Aceita vale-refeição. Faixa de preço: $$.";

    #[tokio::test]
    async fn test_documented_example() {
        let extraction = PatternExtractor::new().extract(ARLETE).await.unwrap();
        let fields = extraction.fields;

        assert_eq!(fields.name.as_deref(), Some("Arlete Bar e Mercearia"));
        assert_eq!(fields.price_level, Some(PriceLevel::Moderate));
        assert_eq!(fields.accepts_voucher, TriState::Yes);
        assert!(fields
            .address
            .as_deref()
            .unwrap()
            .contains("Rua Vupabussu, 101"));
        assert_eq!(fields.neighborhood.as_deref(), Some("Pinheiros"));
        assert_eq!(fields.cuisine, vec!["bar"]);
        assert_eq!(fields.description.as_deref(), Some("Bar descolado..."));
        assert!(extraction.missing.contains(&Field::Hours));
        assert!(extraction.missing.contains(&Field::Accessibility));
    }

    #[test]
    fn test_missing_cues_are_not_guessed() {
        let extractor = PatternExtractor::new();
        let fields = extractor
            .extract_fields("Momokuri: Restaurante japonês com omakase no balcão.")
            .unwrap();

        assert_eq!(fields.name.as_deref(), Some("Momokuri"));
        assert_eq!(fields.price_level, None);
        assert_eq!(fields.accepts_voucher, TriState::Unknown);
        assert_eq!(fields.accessibility, TriState::Unknown);
        assert_eq!(fields.address, None);
        assert_eq!(fields.cuisine, vec!["japonesa"]);

        let missing = fields.missing_fields();
        assert!(missing.contains(&Field::PriceLevel));
        assert!(missing.contains(&Field::AcceptsVoucher));
        assert!(missing.contains(&Field::Address));
    }

    #[test]
    fn test_negative_phrases() {
        let extractor = PatternExtractor::new();
        let fields = extractor
            .extract_fields(
                "Otoshi Izakaya: Izakaya intimista. Não aceita vale-refeição. Não possui acessibilidade para cadeirantes.",
            )
            .unwrap();

        assert_eq!(fields.accepts_voucher, TriState::No);
        assert_eq!(fields.accessibility, TriState::No);
        assert_eq!(fields.cuisine, vec!["izakaya"]);
    }

    #[test]
    fn test_hours_diets_and_highlights() {
        let extractor = PatternExtractor::new();
        let fields = extractor
            .extract_fields(
                "Gael Cozinha Mestiça: Cozinha autoral com opções vegetarianas e veganas. \
                 Destaque para o menu degustação. Possui terraço com música ao vivo. \
                 É acessível. Horário de funcionamento: terça a domingo, 12h às 23h.",
            )
            .unwrap();

        assert_eq!(fields.diet_options, vec!["vegetariana", "vegana"]);
        assert_eq!(fields.accessibility, TriState::Yes);
        assert_eq!(fields.hours.as_deref(), Some("terça a domingo, 12h às 23h"));
        assert_eq!(
            fields.highlights,
            vec![
                "Destaque para o menu degustação",
                "Possui terraço com música ao vivo",
            ]
        );
        assert_eq!(fields.cuisine, vec!["contemporânea"]);
        let description = fields.description.unwrap();
        assert!(description.starts_with("Cozinha autoral"));
        assert!(!description.contains("Horário"));
    }

    #[test]
    fn test_affordable_price_is_not_accessibility() {
        let extractor = PatternExtractor::new();

        let fields = extractor
            .extract_fields("Jojo Ramen: Ramen com preço acessível.")
            .unwrap();
        assert_eq!(fields.accessibility, TriState::Unknown);
        assert_eq!(fields.description.as_deref(), Some("Ramen com preço acessível."));

        let fields = extractor
            .extract_fields("Jojo Ramen: Lámen tradicional. O preço é acessível.")
            .unwrap();
        assert_eq!(fields.accessibility, TriState::Unknown);

        let fields = extractor
            .extract_fields("Momokuri: Japonês. Espaço acessível para cadeirantes.")
            .unwrap();
        assert_eq!(fields.accessibility, TriState::Yes);
    }

    #[test]
    fn test_hours_need_a_day_or_time() {
        let extractor = PatternExtractor::new();

        let fields = extractor
            .extract_fields("Arlete: O espaço funciona como mercearia durante o dia.")
            .unwrap();
        assert_eq!(fields.hours, None);
        assert_eq!(
            fields.description.as_deref(),
            Some("O espaço funciona como mercearia durante o dia.")
        );

        let fields = extractor
            .extract_fields("Arlete: Bar. Funciona de terça a domingo, das 12h às 23h.")
            .unwrap();
        assert_eq!(fields.hours.as_deref(), Some("de terça a domingo, das 12h às 23h"));
    }

    #[test]
    fn test_negated_mentions_are_skipped() {
        let extractor = PatternExtractor::new();

        let fields = extractor
            .extract_fields("Momokuri: Restaurante japonês. Não serve café.")
            .unwrap();
        assert_eq!(fields.cuisine, vec!["japonesa"]);

        let fields = extractor
            .extract_fields("Cantina Roma: Massas frescas. Não serve pizza.")
            .unwrap();
        assert_eq!(fields.cuisine, vec!["italiana"]);

        // A later plain mention still counts
        let fields = extractor
            .extract_fields("Buzina Burgers: Não serve pizza. Hambúrgueres e pizza no almoço.")
            .unwrap();
        assert_eq!(fields.cuisine, vec!["hambúrguer", "pizza"]);
    }

    #[test]
    fn test_price_tokens() {
        let extractor = PatternExtractor::new();

        let fields = extractor
            .extract_fields("Notorious Fish: Fish and chips a R$ 50. Preço: $$$.")
            .unwrap();
        assert_eq!(fields.price_level, Some(PriceLevel::Upscale));

        let fields = extractor
            .extract_fields("Hi Pokee: Pokes montados na hora. Preço: $$$$.")
            .unwrap();
        assert_eq!(fields.price_level, None);
        assert_eq!(fields.cuisine, vec!["poke"]);

        let fields = extractor
            .extract_fields("Buzina Burgers: Hambúrgueres a partir de R$ 40.")
            .unwrap();
        assert_eq!(fields.price_level, None);
    }

    #[test]
    fn test_other_neighborhood_and_avenue() {
        let extractor = PatternExtractor::new();
        let fields = extractor
            .extract_fields("Pirajá (Faria Lima): Boteco carioca. Endereço: Av. Brigadeiro Faria Lima, 64, Itaim Bibi.")
            .unwrap();

        assert_eq!(
            fields.address.as_deref(),
            Some("Av. Brigadeiro Faria Lima, 64, Itaim Bibi")
        );
        assert_eq!(fields.neighborhood.as_deref(), Some("Itaim Bibi"));
        assert_eq!(fields.cuisine, vec!["bar"]);
    }

    #[test]
    fn test_no_name_is_ambiguous() {
        let extractor = PatternExtractor::new();

        assert!(matches!(
            extractor.extract_fields("Um lugar bacana sem nome definido."),
            Err(GuiaError::ParseAmbiguous(_))
        ));
        assert!(matches!(
            extractor.extract_fields(": sem nome antes dos dois pontos"),
            Err(GuiaError::ParseAmbiguous(_))
        ));
        assert!(matches!(
            extractor.extract_fields("Ótimo lugar. Horário: 12h às 22h."),
            Err(GuiaError::ParseAmbiguous(_))
        ));
    }

    #[test]
    fn test_vocabulary_prefers_longest_at_same_position() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.add_term("Pinheiros", &[]);
        vocabulary.add_term("Alto de Pinheiros", &[]);

        assert_eq!(
            vocabulary.find_first("Casa no Alto de Pinheiros"),
            Some("Alto de Pinheiros".to_string())
        );
        assert_eq!(vocabulary.len(), 2);
    }
}

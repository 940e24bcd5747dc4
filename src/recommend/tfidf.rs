//! TF-IDF vectors over product tag text.
//!
//! Tokens are lowercase runs of two or more word characters, English stop
//! words removed. Weights are raw term counts times the smoothed inverse
//! document frequency `ln((1 + n) / (1 + df)) + 1`, and every document vector
//! is scaled to unit length so cosine similarity reduces to a dot product.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::similarity::{normalize, sparse_dot, SparseVector};

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Fitted TF-IDF model holding one unit-length vector per document
#[derive(Debug, Clone, Default)]
pub struct TfIdfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl TfIdfIndex {
    /// Fits the vocabulary and idf weights on `documents` and vectorizes them
    pub fn fit<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
        let tokenized: Vec<Vec<String>> = documents
            .into_iter()
            .map(|doc| tokenize(doc.as_ref(), &stop_words))
            .collect();

        // Sorted vocabulary keeps dimension numbering reproducible
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = tokenized.len() as f64;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.iter().enumerate() {
            vocabulary.insert(term.to_string(), idx);
            idf.push(((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0);
        }

        let vectors = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for token in tokens {
                    if let Some(&dim) = vocabulary.get(token) {
                        *counts.entry(dim).or_insert(0.0) += 1.0;
                    }
                }
                let mut vector: SparseVector =
                    counts.into_iter().map(|(dim, tf)| (dim, tf * idf[dim])).collect();
                normalize(&mut vector);
                vector
            })
            .collect();

        Self {
            vocabulary,
            idf,
            vectors,
        }
    }

    /// Number of vectorized documents
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&dim| self.idf[dim])
    }

    /// Cosine similarity of documents `i` and `j`
    ///
    /// Panics if either index is out of range.
    pub fn similarity(&self, i: usize, j: usize) -> f64 {
        sparse_dot(&self.vectors[i], &self.vectors[j])
    }

    /// Similarity of document `i` to every document, itself included
    pub fn similarities_to(&self, i: usize) -> Vec<f64> {
        let target = &self.vectors[i];
        self.vectors.iter().map(|v| sparse_dot(target, v)).collect()
    }
}

fn tokenize(text: &str, stop_words: &HashSet<&str>) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2 && !stop_words.contains(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(docs: &[&str]) -> TfIdfIndex {
        TfIdfIndex::fit(docs.iter().copied())
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
        let tokens = tokenize("The Red-Shoe, a x for_kids!", &stop_words);
        assert_eq!(tokens, vec!["red", "shoe", "for_kids"]);
    }

    #[test]
    fn test_idf_is_smoothed() {
        let idx = index(&["red shoe", "red shoe sport", "blue hat"]);
        let red = idx.idf("red").unwrap();
        let sport = idx.idf("sport").unwrap();
        assert!((red - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((sport - (2.0f64.ln() + 1.0)).abs() < 1e-12);
        assert!(idx.idf("the").is_none());
    }

    #[test]
    fn test_self_similarity_is_row_maximum() {
        let idx = index(&["red shoe", "red shoe sport", "blue hat", "red hat"]);
        for i in 0..idx.len() {
            let row = idx.similarities_to(i);
            let own = row[i];
            assert!((own - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|&s| s <= own + 1e-12));
        }
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let idx = index(&["red shoe", "red shoe sport", "blue hat"]);
        assert!((idx.similarity(0, 1) - idx.similarity(1, 0)).abs() < 1e-12);
        assert!(idx.similarity(0, 1) > idx.similarity(0, 2));
        assert_eq!(idx.similarity(0, 2), 0.0);
    }

    #[test]
    fn test_empty_tags_give_zero_vector() {
        let idx = index(&["", "red shoe"]);
        assert_eq!(idx.similarity(0, 0), 0.0);
        assert_eq!(idx.similarity(0, 1), 0.0);
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn test_fit_on_nothing_is_empty() {
        let idx = TfIdfIndex::fit(Vec::<String>::new());
        assert!(idx.is_empty());
        assert_eq!(idx.vocabulary_len(), 0);
    }
}

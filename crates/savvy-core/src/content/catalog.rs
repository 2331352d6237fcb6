//! The static article catalog and recommendation over it.

use std::ops::Range;

use once_cell::sync::Lazy;

use super::article::Article;
use super::filter::{filter_by_category, filter_by_season, filter_by_tag};
use super::taxonomy::{PreferenceAxis, classify_value};
use crate::error::Result;
use crate::preference::PreferenceSet;

/// Number of articles returned when recommendation has nothing better.
pub const DEFAULT_PICK_COUNT: usize = 3;

/// Tag that marks trending articles.
pub const TRENDING_TAG: &str = "Trending";

/// An immutable catalog of articles, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    articles: Vec<Article>,
}

impl Catalog {
    /// Creates a catalog from an ordered list of articles.
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    /// Returns the catalog bundled with the application.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Parses a catalog from a JSON array of articles.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let articles: Vec<Article> = serde_json::from_str(json)?;
        Ok(Self::new(articles))
    }

    /// All articles in catalog order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Looks up an article by id.
    pub fn find(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == id)
    }

    /// Articles tagged as trending.
    pub fn trending(&self) -> Vec<Article> {
        filter_by_tag(&self.articles, TRENDING_TAG)
    }

    /// Articles at catalog positions `range`, clamped to the catalog size.
    pub fn slice(&self, range: Range<usize>) -> Vec<Article> {
        let end = range.end.min(self.articles.len());
        let start = range.start.min(end);
        self.articles[start..end].to_vec()
    }

    /// The leading catalog entries used as a deterministic default.
    pub fn default_picks(&self) -> Vec<Article> {
        self.slice(0..DEFAULT_PICK_COUNT)
    }

    /// Recommends articles for a preference set.
    ///
    /// Preferences are applied in order as a sequential intersection: each
    /// value is classified into its axis and the matching filter narrows the
    /// previous result. Values that match no vocabulary are skipped. An empty
    /// preference set, or a filter chain that leaves nothing, yields
    /// [`Catalog::default_picks`].
    pub fn recommend(&self, preferences: &PreferenceSet) -> Vec<Article> {
        if preferences.is_empty() {
            return self.default_picks();
        }

        let mut filtered = self.articles.clone();
        for preference in preferences.iter() {
            filtered = match classify_value(&preference.value) {
                Some(PreferenceAxis::Category) => filter_by_category(&filtered, &preference.value),
                Some(PreferenceAxis::Season) => filter_by_season(&filtered, &preference.value),
                Some(PreferenceAxis::Tag) => filter_by_tag(&filtered, &preference.value),
                None => {
                    tracing::debug!(
                        "Ignoring preference '{}' with unknown value '{}'",
                        preference.id,
                        preference.value
                    );
                    filtered
                }
            };
        }

        if filtered.is_empty() {
            self.default_picks()
        } else {
            filtered
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[allow(clippy::too_many_arguments)]
fn article(
    id: &str,
    title: &str,
    excerpt: &str,
    content: &str,
    image_url: &str,
    source: &str,
    published_at: &str,
    url: &str,
    categories: &[&str],
    tags: &[&str],
) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        content: content.to_string(),
        image_url: image_url.to_string(),
        source: source.to_string(),
        published_at: published_at.to_string(),
        url: url.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new(vec![
        article(
            "1",
            "The Resurgence of Y2K Fashion: How Gen Z is Bringing Back the 2000s",
            "From low-rise jeans to baby tees, Y2K fashion is making a major comeback. Here's how to incorporate these nostalgic pieces into your modern wardrobe.",
            "Y2K fashion has made an undeniable comeback, with Generation Z embracing the nostalgic styles that defined the late 1990s and early 2000s. Low-rise jeans, baby tees, butterfly clips, and platform shoes are once again becoming wardrobe staples. The resurgence is heavily influenced by social media platforms like TikTok and Instagram, where vintage fashion hauls and Y2K styling videos regularly go viral. Celebrities like Bella Hadid and Dua Lipa have also been spotted sporting these throwback looks, further cementing the trend's relevance in today's fashion landscape. To incorporate Y2K elements into your wardrobe without looking like you're wearing a costume, stylists recommend balancing vintage pieces with modern essentials and focusing on quality over quantity.",
            "https://images.unsplash.com/photo-1529139574466-a303027c1d8b",
            "Vogue",
            "2023-05-15",
            "https://example.com/y2k-fashion",
            &["Streetwear", "Vintage"],
            &["Trending", "Celebrity", "Accessories"],
        ),
        article(
            "2",
            "Sustainable Fashion: Brands Leading the Eco-Friendly Revolution",
            "As sustainability becomes increasingly important in the fashion industry, these innovative brands are leading the way with eco-friendly practices.",
            "The fashion industry is one of the world's largest polluters, but a growing movement of sustainable brands is working to change that reality. Companies like Reformation, Patagonia, and Stella McCartney have long been champions of eco-friendly fashion, utilizing recycled materials, ethical labor practices, and transparent supply chains. Newer entrants like Veja, Girlfriend Collective, and Pangaia are also making waves with innovative approaches to sustainability, from biodegradable packaging to carbon-neutral shipping options. Beyond using sustainable materials, these brands are reimagining the entire lifecycle of clothing, with many implementing take-back programs and repair services to extend the lifespan of their products. Consumers are increasingly voting with their wallets, supporting brands that align with their environmental values and pushing the industry toward a more sustainable future.",
            "https://images.unsplash.com/photo-1523381210434-271e8be1f52b",
            "Elle",
            "2023-06-22",
            "https://example.com/sustainable-fashion",
            &["Casual", "Minimalist"],
            &["Sustainable", "Luxury", "Budget-friendly"],
        ),
        article(
            "3",
            "Fall 2023 Runway Report: The Standout Trends You Need to Know",
            "From New York to Paris, the Fall 2023 runway shows revealed the key trends that will define the upcoming season.",
            "The Fall 2023 runway shows have concluded, leaving fashion enthusiasts with a clear roadmap of the season's defining trends. Oversized outerwear dominated the collections, with designers like Balenciaga and Prada showcasing voluminous coats and puffers in unexpected proportions. Rich, earthy tones were ubiquitous, with burgundy, forest green, and chocolate brown emerging as the season's key colors. Textural play was another notable trend, with designers mixing fabrics like leather, tweed, and velvet within single outfits to create depth and visual interest. Modest hemlines and conservative silhouettes suggested a move away from the revealing styles that have dominated recent seasons, though strategic cutouts and sheer panels maintained an element of sensuality. Accessories took a practical turn, with oversized bags, combat boots, and wraparound scarves complementing the season's ready-for-anything aesthetic.",
            "https://images.unsplash.com/photo-1509631179647-0177331693ae",
            "Harper's Bazaar",
            "2023-03-10",
            "https://example.com/fall-runway",
            &["Haute Couture", "Designer"],
            &["Runway", "Trending", "Outerwear"],
        ),
        article(
            "4",
            "Athleisure Evolution: How Workout Wear Became Everyday Fashion",
            "The lines between athletic and casual wear continue to blur as athleisure solidifies its place in mainstream fashion.",
            "What began as a practical solution for busy lifestyles has evolved into one of fashion's most enduring trends: athleisure. The category, which combines athletic functionality with leisure comfort, has transformed how people dress for everyday activities. Premium athleisure brands like Lululemon and Alo Yoga have achieved cult status, while luxury houses including Gucci and Dior have entered the market with high-end interpretations of workout essentials. The pandemic accelerated athleisure's dominance, as remote work normalized comfortable clothing for all occasions. Today's athleisure goes beyond basic leggings and hoodies, incorporating technical fabrics, architectural elements, and fashion-forward details that make these pieces appropriate for settings well beyond the gym. Styling innovations have also contributed to athleisure's staying power, with consumers pairing sports bras with blazers or teaming track pants with heels for a high-low aesthetic that feels thoroughly modern.",
            "https://images.unsplash.com/photo-1483721310020-03333e577078",
            "Fashionista",
            "2023-04-05",
            "https://example.com/athleisure",
            &["Athleisure", "Casual"],
            &["Trending", "Luxury", "Footwear"],
        ),
        article(
            "5",
            "The Return of Maximalism: Bold Colors and Patterns for Summer 2023",
            "After years of neutral minimalism, fashion is embracing joyful excess with vibrant colors, mixed patterns, and statement accessories.",
            "Maximalism is making a triumphant return to fashion, offering a welcome antidote to the restrained aesthetic that has dominated recent years. Summer 2023 collections are awash in joyful excess, with designers embracing clashing patterns, vibrant color combinations, and statement accessories that demand attention. Brands like Versace and Moschino have always championed maximalist expression, but even traditionally minimal labels are now incorporating bolder elements into their offerings. Digital prints, metallic fabrics, and three-dimensional embellishments are key components of the maximalist revival, creating clothes that are as visually engaging as they are wearable. The trend extends to accessories as well, with oversized jewelry, embellished handbags, and eye-catching footwear completing the look. Fashion psychologists suggest that this shift toward expressive dressing reflects a collective desire for joy and self-expression after challenging global events. For those looking to embrace maximalism without overwhelming their existing wardrobe, stylists recommend starting with a single statement piece and building confidence gradually.",
            "https://images.unsplash.com/photo-1503342217505-b0a15ec3261c",
            "Who What Wear",
            "2023-05-30",
            "https://example.com/maximalism",
            &["Bohemian", "Designer"],
            &["Trending", "Accessories", "Collaborations"],
        ),
        article(
            "6",
            "Denim Reimagined: Beyond the Basic Blue Jean",
            "Designers are pushing denim into new territory this season with unexpected silhouettes, treatments, and styling approaches.",
            "Denim, the enduring wardrobe staple, is experiencing a creative renaissance that stretches far beyond basic blue jeans. On recent runways, designers reimagined denim through innovative silhouettes, unconventional treatments, and fresh styling approaches. Oversized proportions reign supreme, with baggy jeans and voluminous denim jackets offering a contemporary take on 90s influences. Patchwork and upcycled denim pieces reflect growing sustainability concerns, with brands like Marine Serre and Re/Done leading the charge in creating new garments from existing materials. Double and even triple denim looks have lost their dated connotations, now appearing fresh when executed in contrasting washes or unexpected proportions. Perhaps most surprising is denim's expansion beyond casual wear, with tailored denim suits, evening gowns, and formal accessories challenging traditional notions of the fabric's appropriate contexts. As denim technology advances, stretch comfort and eco-friendly washing techniques are improving both the sustainability and wearability of these evolving designs.",
            "https://images.unsplash.com/photo-1541099649105-f69ad21f3246",
            "The Zoe Report",
            "2023-06-15",
            "https://example.com/denim-trends",
            &["Casual", "Streetwear"],
            &["Denim", "Sustainable", "DIY"],
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::Preference;

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.find("3").map(|a| a.source.as_str()), Some("Harper's Bazaar"));
        assert!(catalog.find("99").is_none());
    }

    #[test]
    fn test_empty_preferences_return_leading_three() {
        let catalog = Catalog::builtin();
        let first = catalog.recommend(&PreferenceSet::default());
        let second = catalog.recommend(&PreferenceSet::default());
        assert_eq!(ids(&first), vec!["1", "2", "3"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sequential_intersection() {
        let catalog = Catalog::builtin();
        let prefs = PreferenceSet::new(vec![
            Preference::category("Casual"),
            Preference::tag("Luxury"),
        ]);
        assert_eq!(ids(&catalog.recommend(&prefs)), vec!["2", "4"]);
    }

    #[test]
    fn test_category_and_season() {
        let catalog = Catalog::builtin();
        let prefs = PreferenceSet::new(vec![
            Preference::category("Casual"),
            Preference::season("Summer"),
        ]);
        assert_eq!(ids(&catalog.recommend(&prefs)), vec!["2", "4", "6"]);
    }

    #[test]
    fn test_empty_intersection_falls_back_to_defaults() {
        let catalog = Catalog::builtin();
        let prefs = PreferenceSet::new(vec![
            Preference::category("Formal"),
            Preference::tag("DIY"),
        ]);
        assert_eq!(ids(&catalog.recommend(&prefs)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let catalog = Catalog::builtin();
        let prefs = PreferenceSet::new(vec![
            Preference::tag("Glitter"),
            Preference::tag("Denim"),
        ]);
        assert_eq!(ids(&catalog.recommend(&prefs)), vec!["6"]);

        let only_unknown = PreferenceSet::new(vec![Preference::tag("Glitter")]);
        assert_eq!(catalog.recommend(&only_unknown).len(), 6);
    }

    #[test]
    fn test_trending_and_slices() {
        let catalog = Catalog::builtin();
        assert_eq!(ids(&catalog.trending()), vec!["1", "3", "4", "5"]);
        assert_eq!(ids(&catalog.slice(2..5)), vec!["3", "4", "5"]);
        assert_eq!(ids(&catalog.slice(4..10)), vec!["5", "6"]);
        assert!(catalog.slice(8..10).is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[{
            "id": "x", "title": "T", "excerpt": "E", "content": "C",
            "imageUrl": "i", "source": "S", "publishedAt": "2024-01-02",
            "url": "u", "categories": ["Formal"], "tags": ["Luxury"]
        }]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.articles()[0].image_url, "i");
        assert!(Catalog::from_json_str("{}").is_err());
    }
}

use axum::{extract::Query, Json};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// One article in the fixed listing. The listing is a read-only seed loaded
/// at startup, not fetched from anywhere.
#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub title: &'static str,
    pub source: NewsSource,
    pub url: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsSource {
    pub name: &'static str,
}

const fn article(
    title: &'static str,
    source: &'static str,
    url: &'static str,
    description: &'static str,
    category: &'static str,
    image: &'static str,
) -> NewsItem {
    NewsItem {
        title,
        source: NewsSource { name: source },
        url,
        description,
        category,
        image,
    }
}

lazy_static! {
    static ref NEWS_SEED: Vec<NewsItem> = vec![
        article(
            "India’s pension funds warn proposed bond rules may distort values",
            "Economic Times",
            "https://economictimes.indiatimes.com/news/economy/finance/indias-pension-funds-warn-proposed-bond-rules-may-distort-values/articleshow/125902100.cms",
            "Pension-fund managers caution that proposed bond-market rules could distort valuations and hurt long-term investors.",
            "Bonds / Regulatory",
            "/images/Pension.jpg",
        ),
        article(
            "RBI cuts repo rate by 25 bp to 5.25% — ‘rare Goldilocks period’ for economy",
            "Indian Express",
            "https://indianexpress.com/article/business/economy/repo-rate-cut-25-bp-to-5-25-rare-goldilocks-period-says-rbi-governor-10405107/?ref=business_pg",
            "The Reserve Bank of India trims its key repo rate, citing low inflation and stable growth — signalling support for growth.",
            "RBI / Monetary Policy",
            "/images/repo rate.jpg",
        ),
        article(
            "SGB 2017-18 Series XI matures; ₹1 lakh investment now worth over ₹4.3 lakh",
            "Moneycontrol",
            "https://www.moneycontrol.com/news/business/personal-finance/sgb-2017-18-series-xi-matures-on-dec-11-rs-1-lakh-investment-now-worth-over-rs-4-3-lakh-as-rbi-sets-redemption-price-13720119.html",
            "The Sovereign Gold Bond 2017-18 Series XI matures today — early investors see substantial returns.",
            "Investments / Bonds",
            "/images/investment.jpg",
        ),
        article(
            "What is Trump’s Gold Card: Eligibility, benefits, price & how to apply",
            "Times of India",
            "https://timesofindia.indiatimes.com/business/international-business/what-is-trumps-gold-card-eligibility-benefits-price-and-how-to-apply-faqs-answered/articleshow/125900980.cms",
            "A look at Trump‘s Gold Card scheme — who is eligible, what are the benefits, cost and application details.",
            "International / Finance",
            "/images/gold card.jpg",
        ),
        article(
            "Jio Financial Services invests ₹230 cr in two JVs",
            "Inc42",
            "https://inc42.com/buzz/jio-financial-services-pumps-inr-230-cr-in-two-jvs/",
            "Jio Financial Services makes strategic investment of ₹230 crore across two new joint ventures.",
            "Fintech / Investment",
            "/images/jio investment.jpg",
        ),
        article(
            "RBI floating-rate savings bonds explained: returns, eligibility and key rules",
            "LiveMint",
            "https://www.livemint.com/money/rbi-floating-rate-savings-bonds-explained-returns-eligibility-and-key-rules-11765355423116.html",
            "A breakdown of new floating-rate savings bonds issued by RBI — how they work, who should invest, and what to know.",
            "Savings / Bonds",
            "/images/bond.jpg",
        ),
        article(
            "Nippon India Large-Cap Fund tops 5-year return chart — beats benchmark by 5 % CAGR",
            "Financial Express",
            "https://www.financialexpress.com/money/nippon-india-large-cap-fund-tops-5-year-return-chart-beats-benchmark-by-5-cagr-4072324/",
            "Large-cap mutual fund outperforms benchmark over 5 years, delivering strong returns for investors.",
            "Mutual Funds / Investments",
            "/images/Mutual fund.jpg",
        ),
        article(
            "Crypto markets hold steady as investors await US Fed rate-cut guidance",
            "Business Standard",
            "https://www.business-standard.com/markets/cryptocurrency/crypto-markets-hold-steady-as-investors-await-us-fed-rate-cut-guidance-125121000499_1.html",
            "Cryptocurrency markets remain stable amid global rate-cut expectations and investor caution.",
            "Crypto / Markets",
            "/images/crypto.jpg",
        ),
        article(
            "Market down: Where to invest — Large vs Mid vs Small-cap, says HDFC Securities CEO",
            "India Today",
            "https://www.indiatoday.in/business/market/story/market-down-where-to-invest-large-vs-mid-vs-small-cap-hdfc-securities-md-ceo-dheeraj-relli-2834222-2025-12-11",
            "In a down market, HDFC Securities CEO discusses pros and cons of investing in large-, mid- and small-cap funds.",
            "Markets / Equity",
            "/images/market analysis.jpg",
        ),
        article(
            "Home-loan borrowers to save up to ₹9 lakh on a ₹50 lakh loan after rate cuts: Analysis",
            "Financial Express",
            "https://www.financialexpress.com/money/rbi-policy-home-loan-borrowers-save-rs-9-lakh-in-emis-on-rs-50-lakh-loan-after-rate-cuts-in-2025-4066553/",
            "Recent rate cuts by RBI could significantly reduce EMIs and overall cost for home-loan borrowers.",
            "Housing Loans / EMI",
            "/images/home loan.jpg",
        ),
        article(
            "Rate cut by RBI slashes EMIs — good news for home-loan borrowers",
            "The Week",
            "https://www.theweek.in/news/biz-tech/2025/12/05/good-news-for-home-loan-borrowers-as-rbi-slashes-repo-rate-here-is-how-it-impacts-your-emi.html",
            "With RBI’s repo-rate reduction, home-loan EMIs may fall — making loans cheaper for borrowers.",
            "Housing Loans / EMI",
            "/images/emi reduction.jpg",
        ),
    ];
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub limit: Option<String>,
}

/// Fixed listing; `limit` trims to the first N items. A value that does not
/// parse is ignored and the full list comes back.
pub async fn news(Query(query): Query<NewsQuery>) -> Json<Vec<NewsItem>> {
    Json(select(query.limit.as_deref()).to_vec())
}

fn select(limit: Option<&str>) -> &'static [NewsItem] {
    let items: &[NewsItem] = &NEWS_SEED;
    match limit.and_then(|v| v.parse::<usize>().ok()) {
        Some(n) => &items[..n.clamp(1, items.len())],
        None => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_limit_returns_the_full_seed() {
        assert_eq!(select(None).len(), NEWS_SEED.len());
    }

    #[test]
    fn limit_trims_to_the_first_items() {
        let items = select(Some("3"));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, NEWS_SEED[0].title);
        assert_eq!(items[2].title, NEWS_SEED[2].title);
    }

    #[test]
    fn oversized_limit_is_clamped_to_all_items() {
        assert_eq!(select(Some("999")).len(), NEWS_SEED.len());
    }

    #[test]
    fn unparseable_limit_falls_back_to_all_items() {
        assert_eq!(select(Some("abc")).len(), NEWS_SEED.len());
        assert_eq!(select(Some("-2")).len(), NEWS_SEED.len());
    }

    #[test]
    fn zero_limit_still_returns_one_item() {
        assert_eq!(select(Some("0")).len(), 1);
    }
}

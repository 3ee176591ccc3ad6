//! Fixed analysis-prompt templates for industry report generation.
//!
//! The texts are opaque payloads for the agent host, not computed from data,
//! and are byte-for-byte stable per focus area.

/// Focus selector for the analysis prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusArea {
    #[default]
    Overall,
    Ward,
    BusinessType,
    Trends,
}

impl FocusArea {
    /// Parses a focus-area selector; unknown input falls back to `Overall`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input {
            "ward" => Self::Ward,
            "business_type" => Self::BusinessType,
            "trends" => Self::Trends,
            _ => Self::Overall,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Ward => "ward",
            Self::BusinessType => "business_type",
            Self::Trends => "trends",
        }
    }
}

/// Returns the report-generation prompt for a focus area.
#[must_use]
pub const fn analysis_prompt(focus: FocusArea) -> &'static str {
    match focus {
        FocusArea::Overall => OVERALL_PROMPT,
        FocusArea::Ward => WARD_PROMPT,
        FocusArea::BusinessType => BUSINESS_TYPE_PROMPT,
        FocusArea::Trends => TRENDS_PROMPT,
    }
}

const OVERALL_PROMPT: &str = r"札幌市の食品営業許可施設データを分析して、以下の観点から包括的なレポートを作成してください：

1. 地域分布の特徴（区別の施設数と特色）
2. 業種構成の分析（主要業種とその特徴）
3. 市場の競争状況と機会
4. 食文化と地域特性の関係
5. ビジネス展開への示唆

データに基づいた客観的な分析と、実用的な洞察を提供してください。";

const WARD_PROMPT: &str = r"札幌市の各区における食品営業許可施設の分布を分析し、以下について詳しく説明してください：

1. 各区の特徴的な業種構成
2. 中央区への集中とその理由
3. 住宅地域での食品業界の特色
4. 区ごとの市場機会と課題
5. 地域密着型ビジネスの可能性

地域の特性を踏まえた実践的な分析をお願いします。";

const BUSINESS_TYPE_PROMPT: &str = r"札幌市の食品業界における業種別の分析を行い、以下の点を詳述してください：

1. 主要業種（軽飲食、スナック等）の市場状況
2. 業種別の地域展開パターン
3. 成長業種と衰退業種の傾向
4. 新規参入機会のある業種
5. 札幌の食文化を反映した特殊な業種

市場データに基づいた戦略的な視点での分析を求めます。";

const TRENDS_PROMPT: &str = r"札幌市の食品営業許可データの時系列変化を分析し、以下について考察してください：

1. 近年の許可件数の推移とその背景
2. COVID-19の影響と回復状況
3. 新しい食文化・業態の出現
4. 今後のトレンド予測
5. 持続可能な食品業界への示唆

データから読み取れるトレンドと将来展望を具体的に示してください。";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_focus_falls_back_to_overall() {
        assert_eq!(FocusArea::parse("unknown_focus"), FocusArea::Overall);
        assert_eq!(
            analysis_prompt(FocusArea::parse("unknown_focus")),
            analysis_prompt(FocusArea::Overall)
        );
    }

    #[test]
    fn focus_selectors_round_trip() {
        for focus in [
            FocusArea::Overall,
            FocusArea::Ward,
            FocusArea::BusinessType,
            FocusArea::Trends,
        ] {
            assert_eq!(FocusArea::parse(focus.as_str()), focus);
        }
    }

    #[test]
    fn prompts_are_distinct_per_focus_area() {
        let prompts = [
            analysis_prompt(FocusArea::Overall),
            analysis_prompt(FocusArea::Ward),
            analysis_prompt(FocusArea::BusinessType),
            analysis_prompt(FocusArea::Trends),
        ];
        for (i, prompt) in prompts.iter().enumerate() {
            assert!(!prompt.is_empty());
            for other in &prompts[i + 1..] {
                assert_ne!(prompt, other);
            }
        }
    }
}

//! The Researcher → Analyst pipeline

use crew_core::{AgentProfile, TaskSpec};
use crew_workflow::PipelineDefinition;
use std::sync::Arc;

/// Name of the research stage
pub const RESEARCH_TASK: &str = "Market Research";
/// Name of the analysis stage
pub const ANALYSIS_TASK: &str = "Investment Analysis";

/// Report heading
pub const REPORT_TITLE: &str = "Market Analysis Report";
/// Analysis type shown in the report metadata
pub const ANALYSIS_TYPE: &str = "AI Healthcare Market Analysis";

/// The market researcher
pub fn researcher() -> AgentProfile {
    AgentProfile::builder("Market Research Specialist")
        .goal("Find comprehensive market data on emerging technologies")
        .backstory(
            "You are an expert market researcher with 10+ years of experience \
             in technology markets. You excel at discovering market trends, gathering \
             accurate data, and identifying emerging opportunities in the tech sector.",
        )
        .verbose(true)
        .allow_delegation(false)
        .build()
}

/// The market analyst
pub fn analyst() -> AgentProfile {
    AgentProfile::builder("Market Analyst")
        .goal("Analyze market data and identify key opportunities")
        .backstory(
            "You are a senior market analyst with expertise in investment \
             analysis and strategic planning. You excel at interpreting complex market \
             data, identifying patterns, and providing actionable investment recommendations.",
        )
        .verbose(true)
        .allow_delegation(false)
        .build()
}

/// Build the two-stage pipeline
///
/// The analysis stage takes the research stage's output as context. Memory is
/// on; the caller can switch it off with [`PipelineDefinition::memory`].
pub fn market_analysis() -> PipelineDefinition {
    let research = TaskSpec::new(
        RESEARCH_TASK,
        "Research the current market landscape for AI-powered healthcare solutions.\n\
         Include:\n\
         1. Market size and growth projections\n\
         2. Key players and their market share\n\
         3. Recent funding rounds and investments\n\
         4. Regulatory landscape and challenges\n\
         5. Emerging trends and technologies\n\
         6. Geographic market breakdown",
        "Comprehensive market research report including:\n\
         - Current market size (in USD)\n\
         - 5-year growth projections\n\
         - Top 10 key players with brief descriptions\n\
         - Recent major investments and funding rounds\n\
         - Key regulatory considerations\n\
         - 3-5 emerging trends",
        Arc::new(researcher()),
    );

    let analysis = TaskSpec::new(
        ANALYSIS_TASK,
        "Analyze the market research data and identify the top 3 investment \
         opportunities in AI-powered healthcare solutions. For each opportunity, provide:\n\
         1. Investment rationale\n\
         2. Market potential and size\n\
         3. Risk assessment\n\
         4. Competitive landscape\n\
         5. Expected timeline for returns\n\
         6. Recommended investment amount range",
        "Investment analysis report with:\n\
         - Executive summary\n\
         - Top 3 ranked investment opportunities\n\
         - Detailed analysis for each opportunity including rationale, risks, and potential returns\n\
         - Overall market outlook and recommendations\n\
         - Risk mitigation strategies",
        Arc::new(analyst()),
    )
    .with_context(&research);

    PipelineDefinition::new(REPORT_TITLE, ANALYSIS_TYPE)
        .task(research)
        .task(analysis)
        .memory(true)
        .verbose(true)
}

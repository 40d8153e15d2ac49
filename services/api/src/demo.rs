use crate::commands::{render_recommendation, render_stats};
use clap::Args;
use major_advisor::advisor::codec;
use major_advisor::advisor::domain::now_millis;
use major_advisor::advisor::{AdvisorService, InMemoryBackend, MajorCatalog, SubmissionInput};
use major_advisor::error::AppError;
use std::sync::Arc;

/// Engineering-leaning student used by the demo and as a CLI input example.
pub(crate) const SAMPLE_QUESTIONNAIRE: &str = r#"{
  "name": "Nguyễn Minh Khoa",
  "email": "khoa@example.com",
  "preferences": ["Công nghệ", "Máy tính"],
  "traits": {
    "logic": 5, "creativity": 3, "communication": 3,
    "meticulous": 3, "leadership": 3, "patience": 3
  },
  "scores": {
    "math": 9, "literature": 5, "english": 6,
    "informatics": 8, "physics": 7, "chemistry": 5
  },
  "favorites": ["Toán"],
  "orientation": "Kỹ thuật",
  "habits": "Tự học lập trình mỗi tối"
}"#;

const DESIGN_QUESTIONNAIRE: &str = r#"{
  "name": "Lê Thu Hà",
  "preferences": ["Nghệ thuật"],
  "customPreference": "Vẽ minh họa",
  "traits": {
    "logic": 2, "creativity": 5, "communication": 4,
    "meticulous": 4, "leadership": 2, "patience": 3
  },
  "scores": {
    "math": 6, "literature": 8.5, "english": 8,
    "informatics": 6, "physics": 5, "chemistry": 5
  },
  "favorites": ["Văn", "Anh"],
  "orientation": "Thiết kế UI/UX",
  "habits": "Vẽ và chụp ảnh"
}"#;

const HOSPITALITY_QUESTIONNAIRE: &str = r#"{
  "name": "Trần Gia Bảo",
  "preferences": ["Giao tiếp"],
  "traits": {
    "logic": 3, "creativity": 3, "communication": 5,
    "meticulous": 3, "leadership": 4, "patience": 5
  },
  "scores": {
    "math": 6.5, "literature": 7, "english": 8.5,
    "informatics": 5, "physics": 5, "chemistry": 5.5
  },
  "favorites": ["Anh"],
  "orientation": "Du lịch, khách sạn",
  "habits": "Đi phượt và làm tình nguyện"
}"#;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Also print each result's share token
    #[arg(long)]
    pub(crate) show_tokens: bool,
}

pub(crate) fn demo_questionnaires() -> Result<Vec<SubmissionInput>, AppError> {
    [
        SAMPLE_QUESTIONNAIRE,
        DESIGN_QUESTIONNAIRE,
        HOSPITALITY_QUESTIONNAIRE,
    ]
    .iter()
    .map(|raw| serde_json::from_str(raw).map_err(AppError::from))
    .collect()
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = Arc::new(MajorCatalog::bundled()?);
    let advisor = AdvisorService::new(catalog, Arc::new(InMemoryBackend::default()));

    println!("Major advisor demo ({} majors)", advisor.catalog().len());
    for input in demo_questionnaires()? {
        let result = advisor.submit(input)?;
        println!();
        print!("{}", render_recommendation(&result, advisor.catalog()));

        let token = advisor
            .share_token(&result.id)?
            .unwrap_or_default();
        let restored = codec::decode(&token);
        println!(
            "Share link restores result: {}",
            if restored.as_ref() == Some(&result) { "yes" } else { "no" }
        );
        if args.show_tokens {
            println!("Share token: {token}");
        }
    }

    println!();
    print!("{}", render_stats(&advisor.stats(now_millis())));
    Ok(())
}

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::application::dto::question_dto::{
    CreateQuestionDto, DeletedCountDto, QuestionDto, UploadResultDto,
};
use crate::application::errors::ApplicationError;
use crate::application::services::audit_service::AuditService;
use crate::domain::models::audit::ACTION_QUESTIONS_IMPORT;
use crate::domain::models::question::{AnswerOption, Difficulty, NewQuestion, Question};
use crate::domain::models::user::User;
use crate::domain::repositories::question_repository::QuestionRepository;

/// Header set an uploaded CSV must have, in the order error messages list it.
pub const CSV_HEADERS: [&str; 10] = [
    "a",
    "answer",
    "b",
    "c",
    "d",
    "difficulty",
    "exam_type",
    "question",
    "subject",
    "topic",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

struct SeedQuestion {
    exam_type: &'static str,
    subject: &'static str,
    topic: &'static str,
    difficulty: Difficulty,
    question: &'static str,
    options: [&'static str; 4],
    answer: AnswerOption,
}

const DEFAULT_QUESTIONS: [SeedQuestion; 12] = [
    SeedQuestion {
        exam_type: "LET",
        subject: "GenEd",
        topic: "Reading",
        difficulty: Difficulty::Easy,
        question: "What is the main idea of a paragraph?",
        options: ["The supporting details", "The topic sentence", "The conclusion", "The title"],
        answer: AnswerOption::B,
    },
    SeedQuestion {
        exam_type: "LET",
        subject: "GenEd",
        topic: "Math",
        difficulty: Difficulty::Medium,
        question: "What is the value of 3/4 + 1/8?",
        options: ["5/8", "7/8", "1", "9/8"],
        answer: AnswerOption::B,
    },
    SeedQuestion {
        exam_type: "LET",
        subject: "GenEd",
        topic: "Science",
        difficulty: Difficulty::Hard,
        question: "Which layer of the Earth is liquid?",
        options: ["Inner core", "Mantle", "Outer core", "Crust"],
        answer: AnswerOption::C,
    },
    SeedQuestion {
        exam_type: "LET",
        subject: "Mathematics",
        topic: "Algebra",
        difficulty: Difficulty::Medium,
        question: "What is x if 2x + 4 = 10?",
        options: ["2", "3", "4", "5"],
        answer: AnswerOption::B,
    },
    SeedQuestion {
        exam_type: "LET",
        subject: "Science",
        topic: "Biology",
        difficulty: Difficulty::Easy,
        question: "Which organelle is the powerhouse of the cell?",
        options: ["Nucleus", "Mitochondria", "Ribosome", "Golgi apparatus"],
        answer: AnswerOption::B,
    },
    SeedQuestion {
        exam_type: "LET",
        subject: "Social Studies",
        topic: "History",
        difficulty: Difficulty::Medium,
        question: "Who wrote the Philippine novel Noli Me Tangere?",
        options: ["Jose Rizal", "Andres Bonifacio", "Emilio Aguinaldo", "Apolinario Mabini"],
        answer: AnswerOption::A,
    },
    SeedQuestion {
        exam_type: "LET",
        subject: "English",
        topic: "Grammar",
        difficulty: Difficulty::Easy,
        question: "Choose the correct verb: She ___ to the store yesterday.",
        options: ["go", "goes", "went", "gone"],
        answer: AnswerOption::C,
    },
    SeedQuestion {
        exam_type: "LET",
        subject: "Filipino",
        topic: "Wika",
        difficulty: Difficulty::Medium,
        question: "Alin ang tamang baybay?",
        options: ["Tagumpay", "Tagumpaey", "Tagumpai", "Tagumpae"],
        answer: AnswerOption::A,
    },
    SeedQuestion {
        exam_type: "LET",
        subject: "P.E",
        topic: "Fitness",
        difficulty: Difficulty::Easy,
        question: "Ilang minuto ang inirerekomendang moderate exercise kada linggo?",
        options: ["30", "60", "150", "300"],
        answer: AnswerOption::C,
    },
    SeedQuestion {
        exam_type: "CPA",
        subject: "FAR",
        topic: "Assets",
        difficulty: Difficulty::Hard,
        question: "Which asset is measured at amortized cost?",
        options: [
            "Equity securities",
            "Trading securities",
            "Held-to-maturity investments",
            "Derivatives",
        ],
        answer: AnswerOption::C,
    },
    SeedQuestion {
        exam_type: "CPA",
        subject: "Taxation",
        topic: "VAT",
        difficulty: Difficulty::Medium,
        question: "What is the standard VAT rate in the Philippines?",
        options: ["8%", "10%", "12%", "15%"],
        answer: AnswerOption::C,
    },
    SeedQuestion {
        exam_type: "CPA",
        subject: "Auditing",
        topic: "Opinion",
        difficulty: Difficulty::Easy,
        question: "Which opinion is issued when statements are free of material misstatement?",
        options: ["Qualified", "Adverse", "Disclaimer", "Unmodified"],
        answer: AnswerOption::D,
    },
];

impl SeedQuestion {
    fn to_new(&self) -> NewQuestion {
        let [a, b, c, d] = self.options;
        NewQuestion {
            exam_type: self.exam_type.to_string(),
            subject: self.subject.to_string(),
            topic: self.topic.to_string(),
            difficulty: self.difficulty,
            question: self.question.to_string(),
            a: a.to_string(),
            b: b.to_string(),
            c: c.to_string(),
            d: d.to_string(),
            answer: self.answer,
        }
    }
}

/// Why a submitted question was rejected.
enum RejectedField {
    Answer,
    Difficulty,
}

fn to_new_question(dto: CreateQuestionDto) -> Result<NewQuestion, RejectedField> {
    let answer = AnswerOption::parse(&dto.answer).ok_or(RejectedField::Answer)?;
    let difficulty = Difficulty::parse(&dto.difficulty).ok_or(RejectedField::Difficulty)?;
    Ok(NewQuestion {
        exam_type: dto.exam_type,
        subject: dto.subject,
        topic: dto.topic,
        difficulty,
        question: dto.question,
        a: dto.a,
        b: dto.b,
        c: dto.c,
        d: dto.d,
        answer,
    })
}

/// Curates the question bank.
pub struct QuestionService {
    question_repository: Arc<dyn QuestionRepository>,
    audit_service: Arc<AuditService>,
}

impl QuestionService {
    pub fn new(
        question_repository: Arc<dyn QuestionRepository>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self {
            question_repository,
            audit_service,
        }
    }

    pub async fn list_questions(&self) -> Result<Vec<QuestionDto>, ApplicationError> {
        tracing::debug!("Listing questions");

        let questions = self.question_repository.find_all().await?;
        Ok(questions.into_iter().map(QuestionDto::from).collect())
    }

    pub async fn add_question(
        &self,
        dto: CreateQuestionDto,
    ) -> Result<QuestionDto, ApplicationError> {
        tracing::info!("Adding {} question for {}", dto.exam_type, dto.subject);

        let new_question = to_new_question(dto).map_err(|rejected| match rejected {
            RejectedField::Answer => {
                ApplicationError::BadInput("Answer must be one of A, B, C, or D".to_string())
            }
            RejectedField::Difficulty => {
                ApplicationError::BadInput("Invalid difficulty".to_string())
            }
        })?;

        let question = Question::from_new(new_question);
        self.question_repository.save(&question).await?;
        Ok(QuestionDto::from(question))
    }

    pub async fn clear_questions(&self) -> Result<DeletedCountDto, ApplicationError> {
        tracing::info!("Clearing the question bank");

        let deleted = self.question_repository.delete_all().await?;
        Ok(DeletedCountDto { deleted })
    }

    /// Imports questions from an uploaded CSV file; rows with an invalid answer
    /// or difficulty are skipped.
    pub async fn import_csv(
        &self,
        user: &User,
        filename: &str,
        content: &[u8],
    ) -> Result<UploadResultDto, ApplicationError> {
        tracing::info!("Importing questions from {}", filename);

        if !filename.to_lowercase().ends_with(".csv") {
            return Err(ApplicationError::BadInput(
                "Only CSV files are supported".to_string(),
            ));
        }

        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        let text = std::str::from_utf8(content).map_err(|_| {
            ApplicationError::BadInput("Unable to decode CSV (expected UTF-8)".to_string())
        })?;

        let questions = parse_question_csv(text)?;
        let added = questions.len();
        self.question_repository.save_many(&questions).await?;

        self.audit_service
            .log(
                Some(&user.id),
                ACTION_QUESTIONS_IMPORT,
                format!("Imported {} questions from {}", added, filename),
            )
            .await;

        Ok(UploadResultDto { added })
    }

    /// Fills an empty bank with the built-in sample questions.
    pub async fn seed_questions(&self) -> Result<usize, ApplicationError> {
        if self.question_repository.count().await? > 0 {
            return Ok(0);
        }

        let questions: Vec<Question> = DEFAULT_QUESTIONS
            .iter()
            .map(|seed| Question::from_new(seed.to_new()))
            .collect();
        self.question_repository.save_many(&questions).await?;

        tracing::info!("Seeded {} default questions", questions.len());
        Ok(questions.len())
    }
}

fn parse_question_csv(text: &str) -> Result<Vec<Question>, ApplicationError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ApplicationError::BadInput(format!("Invalid CSV: {}", e)))?
        .clone();
    let header_set: BTreeSet<&str> = headers.iter().collect();
    if headers.len() != CSV_HEADERS.len() || header_set != BTreeSet::from(CSV_HEADERS) {
        return Err(ApplicationError::BadInput(format!(
            "CSV must have headers exactly: {}",
            CSV_HEADERS.join(", ")
        )));
    }

    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name, index))
        .collect();

    let mut questions = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable CSV row {}: {}", line + 2, e);
                continue;
            }
        };
        let field = |name: &str| {
            columns
                .get(name)
                .and_then(|index| record.get(*index))
                .unwrap_or_default()
                .to_string()
        };

        let dto = CreateQuestionDto {
            exam_type: field("exam_type"),
            subject: field("subject"),
            topic: field("topic"),
            difficulty: field("difficulty"),
            question: field("question"),
            a: field("a"),
            b: field("b"),
            c: field("c"),
            d: field("d"),
            answer: field("answer"),
        };

        match to_new_question(dto) {
            Ok(new_question) => questions.push(Question::from_new(new_question)),
            Err(_) => tracing::debug!("Skipping CSV row {} with invalid answer or difficulty", line + 2),
        }
    }

    Ok(questions)
}

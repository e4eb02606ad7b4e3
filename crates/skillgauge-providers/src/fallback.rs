//! Built-in question bank used when no AI source is configured or every
//! remote source failed. Always succeeds.

use async_trait::async_trait;
use tracing::debug;

use skillgauge_core::error::SourceError;
use skillgauge_core::model::{Difficulty, Question};
use skillgauge_core::source::{GenerateRequest, QuestionSource};

/// One bank entry; ids, difficulty, and points are assigned at assembly.
struct BankEntry {
    text: &'static str,
    options: [&'static str; 4],
    correct: usize,
    category: &'static str,
    concept: &'static str,
}

const FRONTEND: [BankEntry; 5] = [
    BankEntry {
        text: "Which React hook adds local state to a function component?",
        options: ["useEffect", "useState", "useRef", "useContext"],
        correct: 1,
        category: "React",
        concept: "React State Management",
    },
    BankEntry {
        text: "Which CSS property aligns flex items along the main axis?",
        options: ["align-items", "justify-content", "align-content", "flex-wrap"],
        correct: 1,
        category: "CSS",
        concept: "Flexbox",
    },
    BankEntry {
        text: "What does the === operator compare in JavaScript?",
        options: ["Value only", "Value and type", "Reference only", "Type only"],
        correct: 1,
        category: "JavaScript",
        concept: "Strict Equality",
    },
    BankEntry {
        text: "What is the purpose of lazy loading images on a page?",
        options: [
            "To improve initial page load time",
            "To increase image quality",
            "To preload every asset",
            "To disable caching",
        ],
        correct: 0,
        category: "Web Performance",
        concept: "Lazy Loading",
    },
    BankEntry {
        text: "Why does React need a key prop when rendering lists?",
        options: [
            "To style list items",
            "To track items across re-renders",
            "To sort the list",
            "To validate props",
        ],
        correct: 1,
        category: "React",
        concept: "List Rendering",
    },
];

const BACKEND: [BankEntry; 5] = [
    BankEntry {
        text: "What is the primary purpose of a database index?",
        options: [
            "Speed up lookups on a column",
            "Enforce foreign keys",
            "Reduce disk usage",
            "Encrypt rows",
        ],
        correct: 0,
        category: "Databases",
        concept: "Indexing",
    },
    BankEntry {
        text: "Which HTTP status code indicates a resource was successfully created?",
        options: ["200", "301", "201", "204"],
        correct: 2,
        category: "API Design",
        concept: "HTTP Status Codes",
    },
    BankEntry {
        text: "Which HTTP method is expected to be idempotent?",
        options: ["POST", "PUT", "CONNECT", "PATCH"],
        correct: 1,
        category: "API Design",
        concept: "Idempotency",
    },
    BankEntry {
        text: "What does a cache TTL control?",
        options: [
            "Eviction order",
            "Maximum entry size",
            "Compression level",
            "How long an entry stays valid",
        ],
        correct: 3,
        category: "Caching",
        concept: "Cache Expiry",
    },
    BankEntry {
        text: "Where should a server validate a JWT's signature?",
        options: [
            "Only on login",
            "On every authenticated request",
            "Once per day",
            "Never, the client validates it",
        ],
        correct: 1,
        category: "Authentication",
        concept: "Token Validation",
    },
];

const FULL_STACK: [BankEntry; 5] = [
    BankEntry {
        text: "What problem does CORS solve?",
        options: [
            "Controlled cross-origin requests from browsers",
            "Server-side caching",
            "SQL injection",
            "Load balancing",
        ],
        correct: 0,
        category: "HTTP",
        concept: "CORS",
    },
    BankEntry {
        text: "What does the A in ACID stand for?",
        options: ["Availability", "Atomicity", "Authentication", "Aggregation"],
        correct: 1,
        category: "Databases",
        concept: "Transactions",
    },
    BankEntry {
        text: "When does a JavaScript promise callback run?",
        options: [
            "Immediately, synchronously",
            "After the current call stack empties",
            "On a separate thread",
            "Only inside setTimeout",
        ],
        correct: 1,
        category: "JavaScript",
        concept: "Event Loop",
    },
    BankEntry {
        text: "Why keep configuration in environment variables?",
        options: [
            "They are faster to read",
            "They survive reboots",
            "They keep secrets and settings out of the codebase",
            "They are type-checked",
        ],
        correct: 2,
        category: "Deployment",
        concept: "Environment Config",
    },
    BankEntry {
        text: "In REST, what does a 404 response mean?",
        options: [
            "Server crashed",
            "Request was malformed",
            "Resource was not found",
            "Authentication failed",
        ],
        correct: 2,
        category: "HTTP",
        concept: "HTTP Status Codes",
    },
];

const DATA_SCIENCE: [BankEntry; 5] = [
    BankEntry {
        text: "Which statistic is most robust to outliers?",
        options: ["Mean", "Median", "Range", "Standard deviation"],
        correct: 1,
        category: "Statistics",
        concept: "Central Tendency",
    },
    BankEntry {
        text: "In pandas, what does DataFrame.dropna() do by default?",
        options: [
            "Drops duplicate rows",
            "Drops rows containing missing values",
            "Drops columns with zeros",
            "Drops the index",
        ],
        correct: 1,
        category: "Python",
        concept: "Missing Data",
    },
    BankEntry {
        text: "A model with high training accuracy and low test accuracy is most likely",
        options: ["Underfitting", "Overfitting", "Well regularized", "Poorly initialized"],
        correct: 1,
        category: "Machine Learning",
        concept: "Overfitting",
    },
    BankEntry {
        text: "Which join keeps every row from both tables?",
        options: ["Inner join", "Left join", "Full outer join", "Cross join"],
        correct: 2,
        category: "Data Wrangling",
        concept: "Joins",
    },
    BankEntry {
        text: "What does a p-value below the significance level suggest?",
        options: [
            "Accept the null hypothesis",
            "Reject the null hypothesis",
            "The sample is biased",
            "The effect size is large",
        ],
        correct: 1,
        category: "Statistics",
        concept: "Hypothesis Testing",
    },
];

const MACHINE_LEARNING: [BankEntry; 5] = [
    BankEntry {
        text: "What does the learning rate control in gradient descent?",
        options: [
            "Number of epochs",
            "Batch size",
            "Step size of each parameter update",
            "Weight initialization",
        ],
        correct: 2,
        category: "Model Training",
        concept: "Gradient Descent",
    },
    BankEntry {
        text: "Which metric is most informative for a heavily imbalanced binary classifier?",
        options: [
            "Accuracy",
            "Precision-recall AUC",
            "Mean squared error",
            "R squared",
        ],
        correct: 1,
        category: "Evaluation",
        concept: "Classification Metrics",
    },
    BankEntry {
        text: "What does dropout do during training?",
        options: [
            "Randomly zeroes activations to reduce overfitting",
            "Removes outlier samples",
            "Prunes the dataset",
            "Lowers the learning rate",
        ],
        correct: 0,
        category: "Deep Learning",
        concept: "Regularization",
    },
    BankEntry {
        text: "Why scale features before training an SVM?",
        options: [
            "To reduce dataset size",
            "So no single feature dominates the distance computation",
            "To remove missing values",
            "To increase interpretability",
        ],
        correct: 1,
        category: "Feature Engineering",
        concept: "Feature Scaling",
    },
    BankEntry {
        text: "What is the purpose of a held-out validation set?",
        options: [
            "Training the final model",
            "Data augmentation",
            "Labeling new data",
            "Tuning hyperparameters without touching the test set",
        ],
        correct: 3,
        category: "Evaluation",
        concept: "Data Splits",
    },
];

const DEVOPS: [BankEntry; 5] = [
    BankEntry {
        text: "What is a Docker image?",
        options: [
            "A running process",
            "A virtual machine snapshot",
            "A read-only template for creating containers",
            "A network namespace",
        ],
        correct: 2,
        category: "Containers",
        concept: "Images",
    },
    BankEntry {
        text: "What is the main goal of continuous integration?",
        options: [
            "Deploying to production daily",
            "Merging and testing changes frequently to catch breakage early",
            "Avoiding code review",
            "Scaling servers automatically",
        ],
        correct: 1,
        category: "CI/CD",
        concept: "Continuous Integration",
    },
    BankEntry {
        text: "What does infrastructure-as-code primarily provide?",
        options: [
            "Cheaper servers",
            "Reproducible, version-controlled environments",
            "Faster CPUs",
            "Automatic security patches",
        ],
        correct: 1,
        category: "Infrastructure",
        concept: "Infrastructure as Code",
    },
    BankEntry {
        text: "What is the difference between a metric and a log line?",
        options: [
            "Metrics are text, logs are numbers",
            "Metrics are numeric time series, logs are discrete events",
            "Logs are sampled, metrics are not",
            "There is no difference",
        ],
        correct: 1,
        category: "Monitoring",
        concept: "Observability",
    },
    BankEntry {
        text: "In Kubernetes, what does a Deployment manage?",
        options: [
            "DNS records",
            "Persistent volumes only",
            "Cluster certificates",
            "A replicated set of pods and their rollout",
        ],
        correct: 3,
        category: "Containers",
        concept: "Orchestration",
    },
];

const DESIGN: [BankEntry; 5] = [
    BankEntry {
        text: "What is the main purpose of a usability test?",
        options: [
            "To validate visual branding",
            "To watch real users attempt tasks and find friction",
            "To measure server latency",
            "To A/B test pricing",
        ],
        correct: 1,
        category: "UX Research",
        concept: "Usability Testing",
    },
    BankEntry {
        text: "Which technique most directly establishes visual hierarchy?",
        options: [
            "Using a single font size",
            "Varying size, weight, and contrast",
            "Centering all elements",
            "Adding more colors",
        ],
        correct: 1,
        category: "Visual Design",
        concept: "Hierarchy",
    },
    BankEntry {
        text: "What is the WCAG AA minimum contrast ratio for normal body text?",
        options: ["2:1", "3:1", "4.5:1", "7:1"],
        correct: 2,
        category: "Accessibility",
        concept: "Color Contrast",
    },
    BankEntry {
        text: "Why should an interface give immediate feedback after an action?",
        options: [
            "To increase engagement metrics",
            "So users know the system received their input",
            "To reduce server load",
            "To encourage repeat clicks",
        ],
        correct: 1,
        category: "Interaction Design",
        concept: "System Feedback",
    },
    BankEntry {
        text: "What is a user persona?",
        options: [
            "A real customer under NDA",
            "A fictional profile representing a user segment",
            "A stakeholder interview",
            "A marketing slogan",
        ],
        correct: 1,
        category: "UX Research",
        concept: "Personas",
    },
];

const SECURITY: [BankEntry; 5] = [
    BankEntry {
        text: "Which practice best prevents SQL injection?",
        options: [
            "Hiding error messages",
            "Obfuscating table names",
            "Parameterized queries",
            "Disabling logging",
        ],
        correct: 2,
        category: "Web Security",
        concept: "Injection",
    },
    BankEntry {
        text: "Why are passwords stored as salted hashes?",
        options: [
            "To speed up login",
            "So equal passwords produce different digests",
            "To compress storage",
            "To allow password recovery",
        ],
        correct: 1,
        category: "Cryptography",
        concept: "Password Storage",
    },
    BankEntry {
        text: "What does TLS primarily provide for traffic in transit?",
        options: [
            "Anonymity",
            "Confidentiality and integrity",
            "Faster routing",
            "Compression",
        ],
        correct: 1,
        category: "Network Security",
        concept: "TLS",
    },
    BankEntry {
        text: "What is the first step after confirming an active breach?",
        options: [
            "Delete affected logs",
            "Notify the press",
            "Rebuild all servers",
            "Contain the affected systems",
        ],
        correct: 3,
        category: "Incident Response",
        concept: "Containment",
    },
    BankEntry {
        text: "What does output encoding prevent?",
        options: [
            "Broken links",
            "Cross-site scripting",
            "Session fixation",
            "Port scanning",
        ],
        correct: 1,
        category: "Web Security",
        concept: "XSS",
    },
];

const PRODUCT: [BankEntry; 5] = [
    BankEntry {
        text: "In the RICE framework, what does the E stand for?",
        options: ["Engagement", "Estimation", "Effort", "Evidence"],
        correct: 2,
        category: "Prioritization",
        concept: "RICE",
    },
    BankEntry {
        text: "Which metric best captures whether new users reach first value?",
        options: ["Total signups", "Activation rate", "Server uptime", "Ad impressions"],
        correct: 1,
        category: "Metrics",
        concept: "Activation",
    },
    BankEntry {
        text: "What is the goal of a minimum viable product?",
        options: [
            "Shipping the cheapest possible UI",
            "Learning from real usage with the least investment",
            "Avoiding user research",
            "Maximizing launch revenue",
        ],
        correct: 1,
        category: "Product Strategy",
        concept: "MVP",
    },
    BankEntry {
        text: "What should a product roadmap primarily communicate?",
        options: [
            "Exact ship dates for two years",
            "Engineering task assignments",
            "Direction and expected outcomes over time",
            "Hiring plans",
        ],
        correct: 2,
        category: "Stakeholder Management",
        concept: "Roadmaps",
    },
    BankEntry {
        text: "A cohort retention curve that flattens above zero indicates",
        options: [
            "A dying product",
            "A set of users who found lasting value",
            "A tracking bug",
            "Seasonal noise",
        ],
        correct: 1,
        category: "Metrics",
        concept: "Retention",
    },
];

const GENERAL: [BankEntry; 5] = [
    BankEntry {
        text: "What does git commit record?",
        options: [
            "A snapshot of staged changes with a message",
            "Every file on disk",
            "Only file renames",
            "Remote server state",
        ],
        correct: 0,
        category: "Programming Fundamentals",
        concept: "Version Control",
    },
    BankEntry {
        text: "What is the time complexity of binary search on a sorted array?",
        options: ["O(n)", "O(log n)", "O(n log n)", "O(1)"],
        correct: 1,
        category: "Programming Fundamentals",
        concept: "Complexity",
    },
    BankEntry {
        text: "What is the most effective first step when debugging a failure?",
        options: [
            "Rewrite the module",
            "Reproduce the failure reliably",
            "Add more features",
            "Silence the error",
        ],
        correct: 1,
        category: "Problem Solving",
        concept: "Debugging",
    },
    BankEntry {
        text: "What is the primary purpose of code review?",
        options: [
            "Assigning blame",
            "Catching defects and sharing knowledge",
            "Slowing down releases",
            "Measuring typing speed",
        ],
        correct: 1,
        category: "Collaboration",
        concept: "Code Review",
    },
    BankEntry {
        text: "Who is the primary audience of a project README?",
        options: [
            "The compiler",
            "New users and contributors",
            "The legal team",
            "Search engines",
        ],
        correct: 1,
        category: "Communication",
        concept: "Documentation",
    },
];

fn bank_for_role(role: &str) -> &'static [BankEntry] {
    let role = role.to_lowercase();
    match role.as_str() {
        "frontend developer" => &FRONTEND,
        "backend developer" => &BACKEND,
        "full stack developer" => &FULL_STACK,
        "data scientist" => &DATA_SCIENCE,
        "machine learning engineer" => &MACHINE_LEARNING,
        "devops engineer" => &DEVOPS,
        "ui/ux designer" => &DESIGN,
        "cybersecurity analyst" => &SECURITY,
        "product manager" => &PRODUCT,
        _ => {
            if role.contains("front") {
                &FRONTEND
            } else if role.contains("back") {
                &BACKEND
            } else if role.contains("full") {
                &FULL_STACK
            } else if role.contains("machine") {
                &MACHINE_LEARNING
            } else if role.contains("data") {
                &DATA_SCIENCE
            } else if role.contains("devops") || role.contains("reliability") {
                &DEVOPS
            } else if role.contains("design") || role.contains("ux") {
                &DESIGN
            } else if role.contains("security") || role.contains("cyber") {
                &SECURITY
            } else if role.contains("product") {
                &PRODUCT
            } else {
                &GENERAL
            }
        }
    }
}

/// Roles with a dedicated built-in bank, with the bank size for each.
/// Other role titles match by keyword; unknown roles get the general set.
pub fn builtin_roles() -> Vec<(&'static str, usize)> {
    vec![
        ("Frontend Developer", FRONTEND.len()),
        ("Backend Developer", BACKEND.len()),
        ("Full Stack Developer", FULL_STACK.len()),
        ("Data Scientist", DATA_SCIENCE.len()),
        ("Machine Learning Engineer", MACHINE_LEARNING.len()),
        ("DevOps Engineer", DEVOPS.len()),
        ("UI/UX Designer", DESIGN.len()),
        ("Cybersecurity Analyst", SECURITY.len()),
        ("Product Manager", PRODUCT.len()),
    ]
}

/// Difficulty by position: first third easy, second third medium, rest hard.
fn positional_difficulty(index: usize, count: usize) -> Difficulty {
    if index < count / 3 {
        Difficulty::Easy
    } else if index < 2 * count / 3 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

/// Question source backed by the built-in bank.
pub struct StaticFallback;

impl StaticFallback {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StaticFallback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionSource for StaticFallback {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Question>, SourceError> {
        let bank = bank_for_role(&request.role);
        debug!(role = %request.role, bank_size = bank.len(), "serving built-in questions");

        let mut questions = Vec::with_capacity(request.count);
        for i in 0..request.count {
            let entry = &bank[i % bank.len()];
            let text = if i < bank.len() {
                entry.text.to_string()
            } else {
                format!("{} (continued)", entry.text)
            };
            let difficulty = request
                .difficulty
                .unwrap_or_else(|| positional_difficulty(i, request.count));

            questions.push(Question {
                id: format!("q{}", i + 1),
                text,
                options: entry.options.iter().map(|s| s.to_string()).collect(),
                correct_option: entry.correct,
                difficulty,
                category: entry.category.to_string(),
                concept: entry.concept.to_string(),
                points: difficulty.default_points(),
                explanation: None,
                tags: vec![],
            });
        }
        Ok(questions)
    }
}

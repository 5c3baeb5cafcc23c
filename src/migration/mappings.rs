use std::collections::HashMap;
use std::sync::OnceLock;

/// Destination of a single mapping rule. A `None` category means the legacy
/// combination has no home in the new taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingRule {
    pub new_category_id: Option<i32>,
    pub new_subcategory_id: Option<i32>,
}

/// Rule rows: ((legacy category, legacy subcategory), (new category, new subcategory)).
/// Ordered to match the taxonomy source of truth.
const RULE_ROWS: &[((i32, Option<i32>), (Option<i32>, Option<i32>))] = &[
    // Category-only rules (no subcategory)
    ((390, None), (Some(2), None)),  // Customer Success -> Customer Success + Experience
    ((391, None), (Some(3), None)),  // Cybersecurity + IT -> Cybersecurity
    ((147, None), (Some(4), None)),  // Data + Analytics -> Data & Analytics
    ((148, None), (Some(6), None)),  // Design + UX -> Design
    ((149, None), (Some(8), None)),  // Developer + Engineer -> Engineering
    ((146, None), (Some(9), None)),  // Finance -> Finance
    ((150, None), (Some(11), None)), // HR + Recruiting -> HR + Recruiting
    ((152, None), (Some(12), None)), // Legal -> Legal
    ((153, None), (Some(14), None)), // Marketing -> Marketing
    ((154, None), (Some(15), None)), // Operations -> Operations + Support
    ((155, None), (Some(16), None)), // Product -> Product Management
    ((156, None), (Some(17), None)), // Project Mgmt -> Program and Project Management
    ((157, None), (Some(19), None)), // Sales -> Sales
    ((158, None), (Some(14), None)), // Content -> Marketing
    // Legacy categories with no destination
    ((151, None), (None, None)), // Internships -> none
    // Data + Analytics (4, 5)
    ((147, Some(508)), (Some(4), Some(38))), // Analytics -> Reporting & Insights
    ((147, Some(509)), (Some(4), Some(38))), // Analysis & Reporting -> Reporting & Insights
    ((147, Some(201)), (Some(4), Some(36))), // Business Intelligence -> Business Intelligence (BI)
    ((147, Some(510)), (Some(4), Some(36))), // Business Intelligence -> Business Intelligence (BI)
    ((147, Some(511)), (Some(4), Some(35))), // Data Engineering -> Data Engineering
    ((147, Some(512)), (Some(5), Some(42))), // Data Science -> AI & ML, Data Science
    ((147, Some(513)), (Some(5), Some(41))), // Machine Learning -> AI & ML, ML Engineer
    // Developer + Engineer (8, 19)
    ((149, Some(516)), (Some(8), Some(58))),  // Android (Java) -> Software Engineering
    ((149, Some(517)), (Some(8), Some(58))),  // C++ -> Software Engineering
    ((149, Some(518)), (Some(8), Some(58))),  // C# -> Software Engineering
    ((149, Some(519)), (Some(8), Some(58))),  // DevOps -> Software Engineering
    ((149, Some(520)), (Some(8), Some(58))),  // Front-End -> Software Engineering
    ((149, Some(521)), (Some(8), Some(58))),  // Golang -> Software Engineering
    ((149, Some(522)), (Some(8), Some(58))),  // Java -> Software Engineering
    ((149, Some(523)), (Some(8), Some(58))),  // Javascript -> Software Engineering
    ((149, Some(524)), (Some(8), Some(62))),  // Hardware -> Hardware Engineering
    ((149, Some(525)), (Some(8), Some(58))),  // iOS (Objective-C) -> Software Engineering
    ((149, Some(526)), (Some(8), Some(58))),  // Linux -> Software Engineering
    ((149, Some(527)), (None, None)),         // Management -> none
    ((149, Some(528)), (Some(8), Some(58))),  // .NET -> Software Engineering
    ((149, Some(529)), (Some(8), Some(58))),  // Perl -> Software Engineering
    ((149, Some(530)), (Some(8), Some(58))),  // PHP -> Software Engineering
    ((149, Some(531)), (Some(8), Some(58))),  // Python -> Software Engineering
    ((149, Some(532)), (Some(8), Some(60))),  // QA -> QA/Test Engineering
    ((149, Some(533)), (Some(8), Some(58))),  // Ruby -> Software Engineering
    ((149, Some(534)), (Some(8), Some(58))),  // Salesforce -> Software Engineering
    ((149, Some(535)), (Some(19), Some(126))), // Sales Engineer -> Sales, Sales Engineer
    ((149, Some(536)), (Some(8), Some(58))),  // Scala -> Software Engineering
    // Cybersecurity + IT (3, 15)
    ((391, Some(537)), (Some(3), Some(29))),   // Security -> Security Operations
    ((391, Some(541)), (Some(15), Some(104))), // IT -> IT Support + Helpdesk
    ((391, Some(544)), (Some(15), Some(104))), // Technical Support -> IT Support + Helpdesk
    // Operations (15)
    ((154, Some(542)), (Some(15), Some(105))), // Office Management -> Office Management
    ((154, Some(543)), (Some(15), Some(106))), // Operations Management -> Strategic Operations
    // Sales (19)
    ((157, Some(454)), (Some(19), Some(121))), // Account Development -> Account Executive
    ((157, Some(455)), (Some(19), Some(122))), // Account Management -> Account Management
    ((157, Some(465)), (Some(19), Some(123))), // Sales Management -> Leadership
    ((157, Some(466)), (Some(19), Some(124))), // Sales Operations -> Sales Operations
    ((157, Some(462)), (Some(19), Some(125))), // Inside Sales -> Sales Development
    ((157, Some(535)), (Some(19), Some(126))), // Sales Engineer -> Sales Engineer
];

static RULES: OnceLock<HashMap<(i32, Option<i32>), MappingRule>> = OnceLock::new();

/// Static lookup table keyed by (legacy category, optional legacy subcategory).
/// Built once, read-only afterwards.
pub fn mapping_rules() -> &'static HashMap<(i32, Option<i32>), MappingRule> {
    RULES.get_or_init(|| {
        RULE_ROWS
            .iter()
            .map(|&(key, (new_category_id, new_subcategory_id))| {
                (
                    key,
                    MappingRule {
                        new_category_id,
                        new_subcategory_id,
                    },
                )
            })
            .collect()
    })
}

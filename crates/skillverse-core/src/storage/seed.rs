//! Skill catalog seed data
//!
//! The catalog and its connector relationships are inserted once, inside a
//! single transaction, the first time a database is opened. Once any skill row
//! exists the step is a no-op.

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::Result;

/// (name, category, description, learning resource)
pub const SEED_SKILLS: &[(&str, &str, &str, &str)] = &[
    // Computer Science
    ("Python", "Computer Science", "Popular programming language", "https://www.python.org/about/gettingstarted/"),
    ("JavaScript", "Computer Science", "Web programming language", "https://developer.mozilla.org/en-US/docs/Learn/JavaScript"),
    ("Machine Learning", "Computer Science", "AI and data science", "https://www.coursera.org/learn/machine-learning"),
    ("Web Development", "Computer Science", "Building websites and apps", "https://www.freecodecamp.org/"),
    ("Data Structures", "Computer Science", "Organizing and managing data", "https://www.geeksforgeeks.org/data-structures/"),
    // Art
    ("Digital Painting", "Art", "Creating art digitally", "https://www.youtube.com/results?search_query=digital+painting+tutorial"),
    ("Graphic Design", "Art", "Visual communication design", "https://www.canva.com/learn/graphic-design/"),
    ("Animation", "Art", "Bringing visuals to life", "https://www.youtube.com/results?search_query=animation+basics"),
    ("Photography", "Art", "Capturing moments", "https://www.youtube.com/results?search_query=photography+basics"),
    ("3D Modeling", "Art", "Creating 3D objects", "https://www.blender.org/support/tutorials/"),
    // Science
    ("Biology", "Science", "Study of living organisms", "https://www.khanacademy.org/science/biology"),
    ("Chemistry", "Science", "Study of matter", "https://www.khanacademy.org/science/chemistry"),
    ("Physics", "Science", "Study of matter and energy", "https://www.khanacademy.org/science/physics"),
    ("Neuroscience", "Science", "Study of the nervous system", "https://www.coursera.org/learn/neuroscience"),
    ("Environmental Science", "Science", "Study of the environment", "https://www.khanacademy.org/science/biology/ecology"),
    // Business
    ("Marketing", "Business", "Promoting products/services", "https://www.hubspot.com/resources"),
    ("Project Management", "Business", "Managing projects effectively", "https://www.pmi.org/learning"),
    ("Finance", "Business", "Managing money and investments", "https://www.investopedia.com/"),
    ("Entrepreneurship", "Business", "Starting and running businesses", "https://www.coursera.org/learn/wharton-entrepreneurship"),
    // Music
    ("Music Theory", "Music", "Understanding music structure", "https://www.musictheory.net/"),
    ("Audio Engineering", "Music", "Recording and mixing sound", "https://www.youtube.com/results?search_query=audio+engineering+basics"),
    ("Music Production", "Music", "Creating music digitally", "https://www.youtube.com/results?search_query=music+production+tutorial"),
    // Connectors
    ("AI Art Generation", "Connector", "Combines AI and Art", "https://www.midjourney.com/"),
    ("Bioinformatics", "Connector", "Combines Biology and Programming", "https://www.coursera.org/learn/bioinformatics"),
    ("Data Visualization", "Connector", "Combines Data Science and Design", "https://www.tableau.com/learn"),
    ("Creative Coding", "Connector", "Combines Programming and Art", "https://www.youtube.com/results?search_query=creative+coding"),
    ("Game Development", "Connector", "Combines Programming, Art, and Physics", "https://unity.com/learn"),
    ("Scientific Visualization", "Connector", "Combines Science and Programming", "https://www.youtube.com/results?search_query=scientific+visualization"),
    ("UX Design", "Connector", "Combines Psychology, Design, and Tech", "https://www.coursera.org/learn/user-experience-design"),
    ("Music Programming", "Connector", "Combines Music and Programming", "https://sonic-pi.net/"),
    ("Computational Chemistry", "Connector", "Combines Chemistry and Programming", "https://www.youtube.com/results?search_query=computational+chemistry"),
    ("Digital Marketing", "Connector", "Combines Marketing and Web Development", "https://www.google.com/digital-garage/"),
    ("Financial Modeling", "Connector", "Combines Finance and Programming", "https://www.coursera.org/learn/financial-modeling"),
    ("Environmental Data Science", "Connector", "Combines Environmental Science and Data Analysis", "https://www.coursera.org/learn/data-science-environment"),
    ("Neuromorphic Computing", "Connector", "Combines Neuroscience and Computer Science", "https://www.intel.com/content/www/us/en/research/neuromorphic-computing.html"),
];

/// (base skill, base skill, connector)
///
/// Entries naming a skill missing from [`SEED_SKILLS`] are skipped with a
/// warning; "Programming" is not a catalog skill.
pub const SEED_CONNECTIONS: &[(&str, &str, &str)] = &[
    ("Python", "Digital Painting", "AI Art Generation"),
    ("Machine Learning", "Digital Painting", "AI Art Generation"),
    ("Machine Learning", "Graphic Design", "AI Art Generation"),
    ("Python", "Digital Painting", "Creative Coding"),
    ("Python", "Animation", "Creative Coding"),
    ("Biology", "Python", "Bioinformatics"),
    ("Biology", "Data Structures", "Bioinformatics"),
    ("Machine Learning", "Graphic Design", "Data Visualization"),
    ("Python", "Graphic Design", "Data Visualization"),
    ("Python", "Animation", "Game Development"),
    ("JavaScript", "3D Modeling", "Game Development"),
    ("Physics", "Programming", "Game Development"),
    ("Physics", "Python", "Scientific Visualization"),
    ("Chemistry", "Python", "Scientific Visualization"),
    ("Biology", "Data Visualization", "Scientific Visualization"),
    ("Neuroscience", "Graphic Design", "UX Design"),
    ("Web Development", "Graphic Design", "UX Design"),
    ("Music Theory", "Python", "Music Programming"),
    ("Audio Engineering", "Programming", "Music Programming"),
    ("Music Production", "JavaScript", "Music Programming"),
    ("Chemistry", "Python", "Computational Chemistry"),
    ("Chemistry", "Machine Learning", "Computational Chemistry"),
    ("Marketing", "Web Development", "Digital Marketing"),
    ("Marketing", "Data Visualization", "Digital Marketing"),
    ("Finance", "Python", "Financial Modeling"),
    ("Finance", "Data Visualization", "Financial Modeling"),
    ("Environmental Science", "Python", "Environmental Data Science"),
    ("Environmental Science", "Data Visualization", "Environmental Data Science"),
    ("Neuroscience", "Machine Learning", "Neuromorphic Computing"),
    ("Neuroscience", "Python", "Neuromorphic Computing"),
];

/// Outcome of a seed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// True when the catalog already existed and nothing was inserted
    pub already_seeded: bool,
    pub skills_inserted: usize,
    pub connections_inserted: usize,
    /// Connections dropped because one of their skills is not in the catalog
    pub connections_skipped: usize,
}

/// Insert the skill catalog and connections unless a skill row already exists
pub async fn seed_catalog(pool: &SqlitePool) -> Result<SeedReport> {
    let mut tx = pool.begin().await?;

    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM skills")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        debug!(skills = existing, "Skill catalog already seeded");
        return Ok(SeedReport {
            already_seeded: true,
            ..Default::default()
        });
    }

    let mut ids: HashMap<&str, i64> = HashMap::with_capacity(SEED_SKILLS.len());
    for (name, category, description, resources) in SEED_SKILLS {
        let result = sqlx::query(
            "INSERT INTO skills (name, category, description, learning_resources) VALUES (?, ?, ?, ?)",
        )
        .bind(*name)
        .bind(*category)
        .bind(*description)
        .bind(*resources)
        .execute(&mut *tx)
        .await?;
        ids.insert(*name, result.last_insert_rowid());
    }

    let mut report = SeedReport {
        skills_inserted: ids.len(),
        ..Default::default()
    };

    for (first, second, connector) in SEED_CONNECTIONS {
        let (Some(skill1_id), Some(skill2_id), Some(connector_id)) =
            (ids.get(first), ids.get(second), ids.get(connector))
        else {
            warn!(
                skill1 = %first,
                skill2 = %second,
                connector = %connector,
                "Skipping connection that references an unknown skill"
            );
            report.connections_skipped += 1;
            continue;
        };

        sqlx::query(
            "INSERT INTO skill_connections (skill1_id, skill2_id, connector_skill_id) VALUES (?, ?, ?)",
        )
        .bind(*skill1_id)
        .bind(*skill2_id)
        .bind(*connector_id)
        .execute(&mut *tx)
        .await?;
        report.connections_inserted += 1;
    }

    tx.commit().await?;

    info!(
        skills = report.skills_inserted,
        connections = report.connections_inserted,
        skipped = report.connections_skipped,
        "Skill catalog seeded"
    );
    Ok(report)
}

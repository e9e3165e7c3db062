//! Typed content documents and their fallback literals
//!
//! Each `pub const` [`Resource`] names the document, the field the page
//! section reads, and the literal shown when that field cannot be loaded.

use serde::{Deserialize, Serialize};

use super::Resource;

// ============================================================================
// content.json
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub subtitle: String,
    pub description: String,
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub title: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Navigation {
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default)]
    pub links: Vec<SocialLink>,
}

pub const HERO: Resource<Hero> = Resource::new("hero", "content.json", "/hero", fallback_hero);
pub const ABOUT: Resource<About> = Resource::new("about", "content.json", "/about", fallback_about);
pub const NAVIGATION: Resource<Navigation> =
    Resource::new("navigation", "content.json", "/navigation", fallback_navigation);
pub const SOCIAL: Resource<Social> =
    Resource::new("social", "content.json", "/social", fallback_social);

fn fallback_hero() -> Hero {
    Hero {
        name: "Shreyas Samanta".to_string(),
        subtitle: "Software Engineer".to_string(),
        description:
            "3rd Year Electronic & Software Engineering Student @ University of Glasgow, UK."
                .to_string(),
        cta: "Press ctrl K to start →".to_string(),
    }
}

fn fallback_about() -> About {
    About {
        title: "About Me".to_string(),
        paragraphs: vec![
            "I'm a software engineer studying Electronic & Software Engineering at the University of Glasgow.".to_string(),
            "I like building things end to end, from embedded firmware to the web platforms that sit on top of it.".to_string(),
        ],
    }
}

fn fallback_navigation() -> Navigation {
    Navigation {
        items: ["ABOUT", "PROJECTS", "MUSIC", "USES", "CONTACT"]
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

fn fallback_social() -> Social {
    Social {
        links: vec![
            SocialLink {
                name: "email".to_string(),
                href: "mailto:samantashreyas910@gmail.com".to_string(),
            },
            SocialLink {
                name: "github".to_string(),
                href: "https://github.com/sksmta".to_string(),
            },
            SocialLink {
                name: "linkedin".to_string(),
                href: "https://linkedin.com/in/shreyas-samanta".to_string(),
            },
        ],
    }
}

// ============================================================================
// Section intros (title/subtitle at the top of a document)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageIntro {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactIntro {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

pub const MUSIC_INTRO: Resource<PageIntro> =
    Resource::new("music-intro", "music.json", "", fallback_music_intro);
pub const PROJECTS_INTRO: Resource<PageIntro> =
    Resource::new("projects-intro", "projects.json", "", fallback_projects_intro);
pub const USES_INTRO: Resource<PageIntro> =
    Resource::new("uses-intro", "uses.json", "", fallback_uses_intro);
pub const CONTACT_INTRO: Resource<ContactIntro> =
    Resource::new("contact-intro", "contact.json", "", fallback_contact_intro);

fn fallback_music_intro() -> PageIntro {
    PageIntro {
        title: "Music".to_string(),
        subtitle: "The soundtrack to my coding sessions and creative process".to_string(),
    }
}

fn fallback_projects_intro() -> PageIntro {
    PageIntro {
        title: "Projects".to_string(),
        subtitle:
            "A collection of things I've built, from web applications to open-source contributions"
                .to_string(),
    }
}

fn fallback_uses_intro() -> PageIntro {
    PageIntro {
        title: "Uses".to_string(),
        subtitle: "The tools and technologies I use daily to build things".to_string(),
    }
}

fn fallback_contact_intro() -> ContactIntro {
    ContactIntro {
        title: "Contact".to_string(),
        subtitle: "Let's connect and build something together".to_string(),
        description:
            "I'm always interested in new opportunities, collaborations, and interesting conversations."
                .to_string(),
    }
}

// ============================================================================
// contact.json
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSocial {
    pub github: String,
    pub linkedin: String,
    #[serde(default)]
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub status: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub current: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub social: ContactSocial,
    pub availability: Availability,
    pub location: Location,
}

pub const CONTACT: Resource<Contact> =
    Resource::new("contact", "contact.json", "", fallback_contact);

fn fallback_contact() -> Contact {
    Contact {
        email: "samantashreyas910@gmail.com".to_string(),
        social: ContactSocial {
            github: "https://github.com/sksmta".to_string(),
            linkedin: "https://linkedin.com/in/shreyas-samanta".to_string(),
            twitter: None,
        },
        availability: Availability {
            status: "Available for opportunities".to_string(),
            types: vec![
                "Full-time positions".to_string(),
                "Internship opportunities".to_string(),
                "Freelance projects".to_string(),
            ],
        },
        location: Location {
            current: "Glasgow, UK".to_string(),
            timezone: "GMT (UTC+0)".to_string(),
        },
    }
}

// ============================================================================
// education.json / experience.json
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub title: String,
    #[serde(default)]
    pub items: Vec<EducationItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    #[serde(default)]
    pub items: Vec<ExperienceItem>,
}

pub const EDUCATION: Resource<Education> =
    Resource::new("education", "education.json", "", fallback_education);
pub const EXPERIENCE: Resource<Experience> =
    Resource::new("experience", "experience.json", "", fallback_experience);

fn fallback_education() -> Education {
    Education {
        title: "Education".to_string(),
        items: vec![EducationItem {
            id: "bachelors".to_string(),
            institution: "University of Glasgow".to_string(),
            degree: "Bachelors of Engineering (BEng)".to_string(),
            field: "Electronic & Software Engineering".to_string(),
            location: "Glasgow, UK".to_string(),
            start_date: "2023".to_string(),
            end_date: "2027".to_string(),
            achievements: vec![
                "Specialized in Electronic Circuits, Professional Software Development & Machine Learning"
                    .to_string(),
            ],
            gpa: Some("3.0/4.0".to_string()),
        }],
    }
}

fn fallback_experience() -> Experience {
    Experience {
        title: "Experience".to_string(),
        items: vec![ExperienceItem {
            id: "ugracing".to_string(),
            company: "UGRacing".to_string(),
            position: "Head of Software Development & IT".to_string(),
            location: "Glasgow, UK".to_string(),
            start_date: "2023".to_string(),
            end_date: "Present".to_string(),
            description: vec![
                "Led the software development team for UGRacing, a student-led Formula Student team at the University of Glasgow.".to_string(),
                "Developed and maintained the team's web platform for project management and collaboration.".to_string(),
            ],
            technologies: ["React", "Next.js", "TypeScript", "Node.js"]
                .into_iter()
                .map(String::from)
                .collect(),
        }],
    }
}

// ============================================================================
// music.json
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub tracks: u32,
    pub duration: String,
    pub image: String,
    pub spotify_id: String,
}

pub const PLAYLISTS: Resource<Vec<Playlist>> =
    Resource::new("playlists", "music.json", "/playlists", fallback_playlists);

fn fallback_playlists() -> Vec<Playlist> {
    vec![Playlist {
        id: "coding-focus".to_string(),
        name: "Deep Focus".to_string(),
        description: "Instrumental tracks for deep coding sessions".to_string(),
        color: "#1DB954".to_string(),
        tracks: 47,
        duration: "3h 12m".to_string(),
        image: "/placeholder.svg?height=300&width=300".to_string(),
        spotify_id: "37i9dQZF1DX0XUsuxWHRQd".to_string(),
    }]
}

// ============================================================================
// projects.json
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub live: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub status: Option<String>,
    pub year: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub links: ProjectLinks,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projects {
    #[serde(default)]
    pub featured: Vec<Project>,
    #[serde(default)]
    pub other: Vec<Project>,
}

pub const PROJECTS: Resource<Projects> =
    Resource::new("projects", "projects.json", "", Projects::default);

// ============================================================================
// uses.json
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsesItem {
    pub name: String,
    pub description: String,
    pub category: String,
    pub color: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsesCategory {
    pub id: String,
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub items: Vec<UsesItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uses {
    #[serde(default)]
    pub categories: Vec<UsesCategory>,
}

pub const USES: Resource<Uses> = Resource::new("uses", "uses.json", "", fallback_uses);

fn fallback_uses() -> Uses {
    Uses {
        categories: vec![UsesCategory {
            id: "development".to_string(),
            title: "Development".to_string(),
            icon: "Code".to_string(),
            items: vec![UsesItem {
                name: "Visual Studio Code".to_string(),
                description: "My primary code editor".to_string(),
                category: "Editor".to_string(),
                color: "#007ACC".to_string(),
                url: "https://code.visualstudio.com".to_string(),
            }],
        }],
    }
}

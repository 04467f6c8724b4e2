//! List site data

use anyhow::Result;

use crate::contact::MessageStore;
use crate::content::DataLoader;
use crate::Portfolio;

/// List site data by type
pub async fn run(site: &Portfolio, content_type: &str) -> Result<()> {
    let loader = DataLoader::new(site);

    match content_type {
        "project" | "projects" => {
            let projects = loader.load_projects().await;
            println!("Projects ({}):", projects.len());
            for project in projects {
                println!("  {} - {}", project.title, project.description);
            }
        }
        "experience" | "experiences" => {
            let experiences = loader.load_experiences().await;
            println!("Experiences ({}):", experiences.len());
            for experience in experiences {
                println!("  {}", experience);
            }
        }
        "message" | "messages" => {
            let messages = MessageStore::new(site.messages_path()).load_all().await?;
            println!("Messages ({}):", messages.len());
            for message in messages {
                println!(
                    "  {} - {} <{}>: {}",
                    message.timestamp, message.name, message.email, message.message
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: projects, experiences, messages",
                content_type
            );
        }
    }

    Ok(())
}

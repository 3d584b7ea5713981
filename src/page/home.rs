//! Static content of the landing page.

use crate::markdown::{parse_markdown, Block};

#[derive(Debug, Clone, PartialEq)]
pub struct SectionImage {
    pub src: String,
    /// Alt text, also shown as the caption.
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeSection {
    pub heading: String,
    pub intro: String,
    pub body: Vec<Block>,
    pub image: SectionImage,
    /// Image on the left and text on the right.
    pub reverse: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactLink {
    pub label: String,
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomePage {
    pub sections: Vec<HomeSection>,
    pub blog_button: String,
    pub blog_note: String,
    pub contact_heading: String,
    pub contact: Vec<ContactLink>,
}

fn section(
    heading: &str,
    intro: &str,
    body: &str,
    src: &str,
    caption: &str,
    reverse: bool,
) -> HomeSection {
    HomeSection {
        heading: heading.to_string(),
        intro: intro.to_string(),
        body: parse_markdown(body),
        image: SectionImage {
            src: src.to_string(),
            caption: caption.to_string(),
        },
        reverse,
    }
}

impl HomePage {
    pub fn new() -> Self {
        let sections = vec![
            section(
                "Hi. I'm Ethan",
                "I'm a high-schooler whose goal is to become the best software engineer I can be.",
                "I've been coding since I was 10, and I love to stick my keyboard in virtually \
                 every sector of software development, from low-level OS development to \
                 responsive web pages.",
                "/moose-screenshot.png",
                "Assembly file from my operating system, Moose OS",
                false,
            ),
            section(
                "About Me",
                "Here are some things about me.",
                "I am currently 15 years old, and go to a high school in Melbourne, Australia.\n\n\
                 I began learning coding when I was 10, and since then I have learnt a diverse \
                 range of programming languages and technologies. My favourite ones are Python, \
                 C, Unity and Blender.",
                "/blender-screenshot.png",
                "A 3D model I edited in Blender",
                true,
            ),
            section(
                "Projects I've Made",
                "Because I like to learn a bit of everything, I have a diverse range of projects.",
                "Projects I've worked on include a custom x86 Operating System, a LLM using \
                 PyTorch, as well as various games in Unity. You can check out all of my \
                 projects on [GitHub](https://github.com/frogtheastronaut).\n\n\
                 I also have a blog, written in Next.js and Strapi, where I talk about \
                 coding-related topics, as well the projects I've made.",
                "/moose-os-screenshot.png",
                "Moose OS",
                false,
            ),
        ];

        Self {
            sections,
            blog_button: "Visit my Blog!".to_string(),
            blog_note: "Note: Blog may take a long time to load".to_string(),
            contact_heading: "Contact Me!".to_string(),
            contact: vec![
                ContactLink {
                    label: "GitHub".to_string(),
                    text: "github.com/frogtheastronaut".to_string(),
                    href: "https://github.com/frogtheastronaut".to_string(),
                },
                ContactLink {
                    label: "Email".to_string(),
                    text: "ethanzhangyixuan@gmail.com".to_string(),
                    href: "mailto:ethanzhangyixuan@gmail.com".to_string(),
                },
            ],
        }
    }

    /// Every image the page shows, in order.
    pub fn image_sources(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.image.src.as_str()).collect()
    }
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}

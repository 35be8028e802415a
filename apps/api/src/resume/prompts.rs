// Resume extraction prompt templates.

pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You extract structured information from resumes.
Read the candidate's resume text below and return a single valid JSON object with exactly these keys:

- name: string, the candidate's full name
- email: string, the candidate's email address
- phone: string, the candidate's phone number
- skills: list of strings, e.g. ["Python", "SQL", "Machine Learning"]
- work_experience: list of objects, each with:
    - Designation: string, job title or role
    - Company: string, company name
    - Duration: string, e.g. "Jan 2024 - Jun 2024"
    - Duration_years: integer, whole years in the role
    - Duration_months: integer, remaining months in the role
    - Projects: list of objects, each with:
        - Title: string, project title
        - Description: string, a short summary of the project

Compute Duration_years and Duration_months from each date range
(e.g. "Jul 2024 - Dec 2024" is 0 years and 6 months).
If a value is missing from the resume, use null, or an empty list for list fields.
If a role lists no projects, summarise the work done there as a single project.

Return only the JSON object. Do not wrap it in code fences and do not add commentary.

Example output:
{
  "name": "Meghan Challa",
  "email": "meghan@email.com",
  "phone": "+91-1234567890",
  "skills": ["Python", "SQL", "Machine Learning"],
  "work_experience": [
    {
      "Designation": "AI/ML Data Scientist",
      "Company": "Genpact",
      "Duration": "Jul 2024 - Dec 2024",
      "Duration_years": 0,
      "Duration_months": 6,
      "Projects": [
        {
          "Title": "Human-in-the-Loop Prompt Tuning",
          "Description": "Built a feedback pipeline that feeds reviewer corrections back as few-shot examples to improve entity extraction."
        }
      ]
    }
  ]
}

Candidate resume:
{candidate_resume}
"#;

pub fn build_extraction_prompt(resume_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE.replace("{candidate_resume}", resume_text)
}

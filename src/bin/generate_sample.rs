use nobel_data::data::Field;

/// Columns: year, category, prize_share, full_name, sex, birth_date,
/// birth_country_current, birth_city, organization_name, organization_city,
/// organization_country, ISO. Empty cells are absent values.
const ROWS: [[&str; 12]; 12] = [
    [
        "1901", "Physics", "1/1", "Wilhelm Conrad Röntgen", "Male", "1845-03-27",
        "Germany", "Lennep", "Munich University", "Munich", "Germany", "DEU",
    ],
    [
        "1903", "Physics", "1/4", "Marie Curie, née Sklodowska", "Female", "1867-11-07",
        "Poland", "Warsaw", "", "", "", "POL",
    ],
    [
        "1903", "Physics", "1/4", "Pierre Curie", "Male", "1859-05-15",
        "France", "Paris", "École municipale de physique et de chimie industrielles", "Paris",
        "France", "FRA",
    ],
    [
        "1911", "Chemistry", "1/1", "Marie Curie, née Sklodowska", "Female", "1867-11-07",
        "Poland", "Warsaw", "Sorbonne University", "Paris", "France", "POL",
    ],
    [
        "1917", "Peace", "1/1", "", "", "",
        "", "", "International Committee of the Red Cross", "Geneva", "Switzerland", "",
    ],
    [
        "1921", "Physics", "1/1", "Albert Einstein", "Male", "1879-03-14",
        "Germany", "Ulm", "Kaiser-Wilhelm-Institut für Physik", "Berlin", "Germany", "DEU",
    ],
    [
        "1945", "Medicine", "1/3", "Sir Alexander Fleming", "Male", "1881-08-06",
        "United Kingdom", "Darvel", "London University", "London", "United Kingdom", "GBR",
    ],
    [
        "1964", "Peace", "1/1", "Martin Luther King Jr.", "Male", "1929-01-15",
        "United States of America", "Atlanta", "", "", "", "USA",
    ],
    [
        "1965", "Literature", "1/1", "Michail Sholokhov", "Male", "1905-05-24",
        "Russia", "Kruzhilin", "", "", "", "RUS",
    ],
    [
        "1969", "Economics", "1/2", "Ragnar Frisch", "Male", "1895-03-03",
        "Norway", "Oslo", "University of Oslo", "Oslo", "Norway", "NOR",
    ],
    [
        "2012", "Physics", "1/2", "Serge Haroche", "Male", "1944-09-11",
        "Morocco", "Casablanca", "Collège de France", "Paris", "France", "MAR",
    ],
    [
        "2014", "Peace", "1/2", "Malala Yousafzai", "Female", "1997-07-12",
        "Pakistan", "Mingora", "", "", "", "PAK",
    ],
];

fn main() {
    let output_path = "nobel_sample.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    let header: Vec<&str> = Field::RAW.iter().map(|f| f.name()).collect();
    writer.write_record(&header).expect("Failed to write header");
    for row in ROWS {
        writer.write_record(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {} laureate rows to {output_path}", ROWS.len());
}

use std::collections::HashMap;
use tagcheck::fields;

pub struct Address {
    pub city: String,
    pub country: String,
}

fields!(Address {
    city as "City": "required",
    country as "Country": "required",
});

impl Address {
    pub fn new(city: &str, country: &str) -> Self {
        Address {
            city: city.to_string(),
            country: country.to_string(),
        }
    }
}

pub struct School {
    pub name: String,
}

fields!(School {
    name as "Name": "required",
});

impl School {
    pub fn new(name: &str) -> Self {
        School {
            name: name.to_string(),
        }
    }
}

pub struct User {
    pub id: String,
    pub name: String,
    pub addresses: Vec<Address>,
    pub hobbies: Vec<String>,
    pub schools: HashMap<String, School>,
    pub wallet: HashMap<String, i64>,
}

fields!(User {
    id as "Id": "required",
    name as "Name": "required",
    addresses as "Addresses": "required,dive",
    hobbies as "Hobbies": "required,dive,required,min=3",
    schools as "Schools": "required,dive,keys,required,min=2,endkeys,dive",
    wallet as "Wallet": "dive,keys,required,endkeys,required,gt=0",
});

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A user with problems at every level: empty scalars, empty address
/// fields, a blank and a too-short hobby, and an empty wallet balance.
pub fn sample_user() -> User {
    User {
        id: String::new(),
        name: String::new(),
        addresses: vec![Address::new("", ""), Address::new("", "")],
        hobbies: strings(&["Gaming", "Coding", "", "X"]),
        schools: HashMap::from([
            ("SD".to_string(), School::new("SDN 2 Bumi Indah")),
            ("SMP".to_string(), School::new("SMPN 3 Katingan Kuala")),
            ("SMA".to_string(), School::new("SMAN 1 Katingan Kuala")),
        ]),
        wallet: HashMap::from([("BCA".to_string(), 1_000_000), ("MANDIRI".to_string(), 0)]),
    }
}

pub fn valid_user() -> User {
    User {
        id: "u-1".to_string(),
        name: "Rizky".to_string(),
        addresses: vec![Address::new("Jakarta", "Indonesia")],
        hobbies: strings(&["Gaming"]),
        schools: HashMap::from([("SD".to_string(), School::new("SDN 2 Bumi Indah"))]),
        wallet: HashMap::from([("BCA".to_string(), 1_000_000)]),
    }
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fields!(LoginRequest {
    email as "Email": "required,email",
    password as "Password": "required,min=5",
});

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}
